//! Safety tags attached to a function.
//!
//! A function carries a list of [`Property`] values (the tags written in its
//! safety attributes) plus a table of [`TagSpec`] entries describing each tag
//! name. The producer is expected to emit a spec for every tag it uses, but
//! nothing checks that, so rendering must work without one.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of a safety tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagType {
    Precond,
    Hazard,
    Option,
}

impl TagType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagType::Precond => "precond",
            TagType::Hazard => "hazard",
            TagType::Option => "option",
        }
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Safety annotations of one function.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tags {
    /// Tags in the order they appear in the source attributes.
    pub tags: Vec<Property>,
    /// Tag name to its definition.
    pub spec: BTreeMap<String, TagSpec>,
    /// Free-form documentation lines.
    pub docs: Vec<String>,
}

/// One tag usage, e.g. `hazard.InitializedInLen(l)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub tag: TagName,
    /// Raw argument string. The format depends on the tag.
    pub args: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagName {
    pub name: String,
    pub typ: Option<TagType>,
}

/// Definition of a tag name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagSpec {
    /// Expected parameter names.
    pub args: Vec<String>,
    pub desc: Option<String>,
    pub expr: Option<String>,
    /// Tag types this tag may be used as.
    pub types: Vec<TagType>,
    pub url: Option<String>,
}

/// A tag ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedTag {
    /// `typ.name(args)`, matching the attribute syntax.
    pub label: String,
    pub name: String,
    pub typ: Option<TagType>,
    pub args: String,
    pub desc: Option<String>,
    pub expr: Option<String>,
    pub url: Option<String>,
    /// False when no spec entry exists for the tag name.
    pub documented: bool,
}

impl Property {
    pub fn new(name: impl Into<String>, typ: Option<TagType>, args: impl Into<String>) -> Self {
        Self {
            tag: TagName {
                name: name.into(),
                typ,
            },
            args: args.into(),
        }
    }

    pub fn label(&self) -> String {
        let mut label = String::new();
        if let Some(typ) = self.tag.typ {
            label.push_str(typ.as_str());
            label.push('.');
        }
        label.push_str(&self.tag.name);
        if !self.args.is_empty() {
            label.push('(');
            label.push_str(&self.args);
            label.push(')');
        }
        label
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl Tags {
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.docs.is_empty()
    }

    pub fn spec_for(&self, prop: &Property) -> Option<&TagSpec> {
        self.spec.get(&prop.tag.name)
    }

    /// Render a property, falling back to its raw name and args when the
    /// spec table has no entry for it.
    pub fn render(&self, prop: &Property) -> RenderedTag {
        let spec = self.spec_for(prop);
        RenderedTag {
            label: prop.label(),
            name: prop.tag.name.clone(),
            typ: prop.tag.typ,
            args: prop.args.clone(),
            desc: spec.and_then(|s| s.desc.clone()),
            expr: spec.and_then(|s| s.expr.clone()),
            url: spec.and_then(|s| s.url.clone()),
            documented: spec.is_some(),
        }
    }

    pub fn render_all(&self) -> Vec<RenderedTag> {
        self.tags.iter().map(|prop| self.render(prop)).collect()
    }

    /// Tag names used by a property but absent from `spec`, deduplicated in
    /// first-use order.
    pub fn missing_specs(&self) -> Vec<&str> {
        let mut missing: Vec<&str> = Vec::new();
        for prop in &self.tags {
            let name = prop.tag.name.as_str();
            if !self.spec.contains_key(name) && !missing.contains(&name) {
                missing.push(name);
            }
        }
        missing
    }

    /// Properties of the given type.
    pub fn of_type(&self, typ: TagType) -> impl Iterator<Item = &Property> {
        self.tags.iter().filter(move |p| p.tag.typ == Some(typ))
    }
}
