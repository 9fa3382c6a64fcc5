//! Stylesheets, rules and the styles they produce.
//!
//! A [`Stylesheet`] is a list of [`Rule`]s tagged with an origin. When a
//! rule's selector applies to a node, each of its declarations becomes a
//! [`Style`] in that node's [`StyleMap`](cascade::StyleMap).

pub mod cascade;
pub mod selectors;

use std::fmt;
use std::rc::Rc;

use crate::value::ParsedValue;
use selectors::ComplexSelector;

/// Where a style came from, lowest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleOrigin {
    /// The toolkit's default stylesheet.
    UserAgent,
    /// Application stylesheets.
    Author,
    /// A node's own inline style.
    Inline,
    /// Set directly in code, outside CSS.
    User,
}

impl fmt::Display for StyleOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UserAgent => "user-agent",
            Self::Author => "author",
            Self::Inline => "inline",
            Self::User => "user",
        })
    }
}

/// One `property: value` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// Lowercase property name.
    pub property: String,
    pub value: ParsedValue,
    pub important: bool,
}

impl Declaration {
    pub fn new(property: &str, value: impl Into<ParsedValue>) -> Self {
        Self {
            property: property.to_ascii_lowercase(),
            value: value.into(),
            important: false,
        }
    }
}

/// A selector list and the declarations it guards.
#[derive(Debug, Clone)]
pub struct Rule {
    pub selectors: Vec<Rc<ComplexSelector>>,
    pub declarations: Vec<Rc<Declaration>>,
}

impl Rule {
    pub fn new(selector: ComplexSelector) -> Self {
        Self {
            selectors: vec![Rc::new(selector)],
            declarations: Vec::new(),
        }
    }

    /// Adds another selector to the rule's selector list.
    pub fn or(mut self, selector: ComplexSelector) -> Self {
        self.selectors.push(Rc::new(selector));
        self
    }

    pub fn declare(mut self, property: &str, value: impl Into<ParsedValue>) -> Self {
        self.declarations
            .push(Rc::new(Declaration::new(property, value)));
        self
    }

    /// Adds an `!important` declaration.
    pub fn declare_important(mut self, property: &str, value: impl Into<ParsedValue>) -> Self {
        let mut declaration = Declaration::new(property, value);
        declaration.important = true;
        self.declarations.push(Rc::new(declaration));
        self
    }
}

/// An ordered list of rules from one source.
#[derive(Debug, Clone)]
pub struct Stylesheet {
    pub url: Option<Rc<str>>,
    pub origin: StyleOrigin,
    pub rules: Vec<Rule>,
}

impl Stylesheet {
    pub fn new(origin: StyleOrigin) -> Self {
        Self {
            url: None,
            origin,
            rules: Vec::new(),
        }
    }

    /// An inline style: one rule that applies to its owner only.
    pub fn inline<'a>(declarations: impl IntoIterator<Item = (&'a str, ParsedValue)>) -> Self {
        let rule = declarations
            .into_iter()
            .fold(Rule::new(ComplexSelector::universal()), |rule, (p, v)| {
                rule.declare(p, v)
            });
        Self::new(StyleOrigin::Inline).rule(rule)
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(Rc::from(url));
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }
}

/// A declaration paired with the selector that brought it to a node.
#[derive(Debug, Clone)]
pub struct Style {
    pub selector: Rc<ComplexSelector>,
    pub declaration: Rc<Declaration>,
    pub origin: StyleOrigin,
    /// The stylesheet the rule came from; `None` for inline styles.
    pub url: Option<Rc<str>>,
}

impl Style {
    pub fn property(&self) -> &str {
        &self.declaration.property
    }

    pub fn value(&self) -> &ParsedValue {
        &self.declaration.value
    }
}

/// Styles are equal when they share the same selector and declaration.
impl PartialEq for Style {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.selector, &other.selector)
            && Rc::ptr_eq(&self.declaration, &other.declaration)
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {{ {}: {}{} }}",
            self.selector,
            self.declaration.property,
            self.declaration.value,
            if self.declaration.important {
                " !important"
            } else {
                ""
            }
        )
    }
}
