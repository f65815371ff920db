//! Locator strategies.
//!
//! A [`Locator`] names a UI element by one of a small set of strategies
//! (role + accessible name, test id, attribute, CSS selector, text)
//! instead of a loose selector string. Locators render to a JavaScript
//! resolver evaluated in the page; interaction helpers additionally tag
//! the resolved element with a one-shot `data-vigil-hit` attribute so a
//! real element handle can be fetched afterwards by CSS.

use std::fmt;

/// Attribute used to tag a resolved element for handle lookup.
pub const HIT_ATTR: &str = "data-vigil-hit";

/// ARIA-ish roles the scenarios need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Button,
    Link,
    Heading,
    Checkbox,
    Textbox,
}

impl Role {
    /// CSS that collects candidate elements for this role.
    fn candidate_selector(&self) -> &'static str {
        match self {
            Role::Button => "button, [role='button'], input[type='submit'], input[type='button']",
            Role::Link => "a[href], [role='link']",
            Role::Heading => "h1, h2, h3, h4, h5, h6, [role='heading']",
            Role::Checkbox => "input[type='checkbox'], [role='checkbox']",
            Role::Textbox => {
                "input:not([type]), input[type='text'], input[type='password'], \
                 input[type='email'], textarea, [role='textbox']"
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Button => "button",
            Role::Link => "link",
            Role::Heading => "heading",
            Role::Checkbox => "checkbox",
            Role::Textbox => "textbox",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Strategy {
    Role { role: Role, name: String },
    TestId(String),
    Attr { name: String, value: String },
    Css(String),
    Text(String),
}

/// A strategy for finding a UI element, optionally narrowed by
/// descendant text and/or scoped under an ancestor locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    strategy: Strategy,
    has_text: Option<String>,
    scope: Option<Box<Locator>>,
}

/// JSON-escape a string for embedding in generated JavaScript.
pub(crate) fn js_str(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_default()
}

impl Locator {
    pub fn role(role: Role, name: impl Into<String>) -> Self {
        Self::from_strategy(Strategy::Role {
            role,
            name: name.into(),
        })
    }

    pub fn test_id(id: impl Into<String>) -> Self {
        Self::from_strategy(Strategy::TestId(id.into()))
    }

    pub fn attr(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::from_strategy(Strategy::Attr {
            name: name.into(),
            value: value.into(),
        })
    }

    /// Shorthand for the placeholder-attribute lookups the login and
    /// signup forms rely on.
    pub fn placeholder(value: impl Into<String>) -> Self {
        Self::attr("placeholder", value)
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Self::from_strategy(Strategy::Css(selector.into()))
    }

    pub fn text(needle: impl Into<String>) -> Self {
        Self::from_strategy(Strategy::Text(needle.into()))
    }

    fn from_strategy(strategy: Strategy) -> Self {
        Self {
            strategy,
            has_text: None,
            scope: None,
        }
    }

    /// Keep only candidates whose text content contains `needle`.
    pub fn has_text(mut self, needle: impl Into<String>) -> Self {
        self.has_text = Some(needle.into());
        self
    }

    /// Restrict matching to descendants of `ancestor`'s matches.
    pub fn within(mut self, ancestor: Locator) -> Self {
        self.scope = Some(Box::new(ancestor));
        self
    }

    /// CSS selector matching the element tagged with `nonce`.
    pub fn hit_selector(nonce: &str) -> String {
        format!("[{HIT_ATTR}=\"{nonce}\"]")
    }

    // ── JS generation ───────────────────────────────────────────

    fn roots_expr(&self) -> String {
        match &self.scope {
            None => "[document]".to_string(),
            Some(ancestor) => ancestor.cands_expr(),
        }
    }

    /// Expression evaluating to the candidate array for this locator.
    fn cands_expr(&self) -> String {
        let roots = self.roots_expr();
        let base = match &self.strategy {
            Strategy::Role { role, name } => format!(
                "({roots}).flatMap((r) => Array.from(r.querySelectorAll({sel}))\
                 .filter((el) => accName(el) === {name}))",
                sel = js_str(role.candidate_selector()),
                name = js_str(name),
            ),
            Strategy::TestId(id) => {
                let sel = format!("[data-testid={}]", js_str(id));
                format!(
                    "({roots}).flatMap((r) => Array.from(r.querySelectorAll({})))",
                    js_str(&sel)
                )
            }
            Strategy::Attr { name, value } => {
                let sel = format!("[{}={}]", name, js_str(value));
                format!(
                    "({roots}).flatMap((r) => Array.from(r.querySelectorAll({})))",
                    js_str(&sel)
                )
            }
            Strategy::Css(selector) => format!(
                "({roots}).flatMap((r) => Array.from(r.querySelectorAll({})))",
                js_str(selector)
            ),
            Strategy::Text(needle) => format!(
                "({roots}).flatMap((r) => Array.from(r.querySelectorAll('*'))\
                 .filter((el) => hasText(el, {t}) && \
                 !Array.from(el.children).some((c) => hasText(c, {t}))))",
                t = js_str(needle),
            ),
        };
        match &self.has_text {
            Some(needle) => format!(
                "({base}).filter((el) => hasText(el, {}))",
                js_str(needle)
            ),
            None => base,
        }
    }

    fn wrap(&self, payload: &str) -> String {
        format!(
            r#"(() => {{
  const visible = (el) => {{
    if (!el || !el.isConnected) return false;
    const style = window.getComputedStyle(el);
    if (style.display === 'none' || style.visibility === 'hidden' || style.opacity === '0') return false;
    const rect = el.getBoundingClientRect();
    return rect.width > 0 && rect.height > 0;
  }};
  const accName = (el) => ((el.getAttribute('aria-label') || el.value || el.textContent || '') + '').trim().replace(/\s+/g, ' ');
  const hasText = (el, t) => ((el.textContent || '').includes(t));
  const cands = {cands};
  const pick = cands.find(visible) || cands[0] || null;
  {payload}
}})()"#,
            cands = self.cands_expr(),
        )
    }

    /// JS returning `{{found, visible, disabled, checked}}` as a JSON string.
    pub fn probe_js(&self) -> String {
        self.wrap(
            "return JSON.stringify({\n    found: cands.length,\n    visible: cands.filter(visible).length,\n    disabled: pick ? !!(pick.disabled || pick.getAttribute('aria-disabled') === 'true') : null,\n    checked: pick ? !!pick.checked : null\n  });",
        )
    }

    /// JS returning `{{found, value}}` for one attribute, as a JSON string.
    pub fn attribute_js(&self, attr_name: &str) -> String {
        self.wrap(&format!(
            "return JSON.stringify({{found: cands.length, value: pick ? pick.getAttribute({}) : null}});",
            js_str(attr_name)
        ))
    }

    /// JS tagging the preferred candidate with `nonce` and returning
    /// `{{found}}` as a JSON string.
    pub fn tag_js(&self, nonce: &str) -> String {
        self.wrap(&format!(
            "if (pick) pick.setAttribute('{HIT_ATTR}', {});\n  return JSON.stringify({{found: cands.length}});",
            js_str(nonce)
        ))
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ancestor) = &self.scope {
            write!(f, "{ancestor} >> ")?;
        }
        match &self.strategy {
            Strategy::Role { role, name } => {
                write!(f, "role={}[name=\"{}\"]", role.as_str(), name)?
            }
            Strategy::TestId(id) => write!(f, "testid=\"{id}\"")?,
            Strategy::Attr { name, value } => write!(f, "[{name}=\"{value}\"]")?,
            Strategy::Css(selector) => write!(f, "css=\"{selector}\"")?,
            Strategy::Text(needle) => write!(f, "text=\"{needle}\"")?,
        }
        if let Some(needle) = &self.has_text {
            write!(f, " has_text=\"{needle}\"")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_strategy() {
        assert_eq!(
            Locator::role(Role::Button, "Sign up").to_string(),
            "role=button[name=\"Sign up\"]"
        );
        assert_eq!(Locator::test_id("feed").to_string(), "testid=\"feed\"");
        assert_eq!(
            Locator::placeholder("Username").to_string(),
            "[placeholder=\"Username\"]"
        );
        assert_eq!(
            Locator::css("div.group").has_text("My Comment").to_string(),
            "css=\"div.group\" has_text=\"My Comment\""
        );
    }

    #[test]
    fn scoped_display_chains_ancestor_first() {
        let loc = Locator::role(Role::Button, "Delete comment")
            .within(Locator::css("div.group").has_text("My Comment"));
        assert_eq!(
            loc.to_string(),
            "css=\"div.group\" has_text=\"My Comment\" >> role=button[name=\"Delete comment\"]"
        );
    }

    #[test]
    fn probe_js_embeds_escaped_selector() {
        let js = Locator::css("a[href^='/users/']").probe_js();
        assert!(js.contains("querySelectorAll(\"a[href^='/users/']\")"), "{js}");
        assert!(js.contains("JSON.stringify"));
    }

    #[test]
    fn role_js_filters_by_accessible_name() {
        let js = Locator::role(Role::Button, "Share").probe_js();
        assert!(js.contains("accName(el) === \"Share\""), "{js}");
        assert!(js.contains("input[type='submit']"), "{js}");
    }

    #[test]
    fn attr_values_with_quotes_are_escaped() {
        let js = Locator::attr("alt", "he said \"hi\"").probe_js();
        // the value survives two levels of JSON escaping; the raw
        // unescaped quoted form must never reach the JS source
        assert!(js.contains("he said"), "{js}");
        assert!(!js.contains("=\"hi\""), "{js}");
    }

    #[test]
    fn text_strategy_matches_deepest_elements() {
        let js = Locator::text("Verification Page").probe_js();
        assert!(js.contains("hasText(el, \"Verification Page\")"), "{js}");
        assert!(js.contains("el.children"), "{js}");
    }

    #[test]
    fn scoped_cands_use_ancestor_roots() {
        let js = Locator::role(Role::Button, "Delete comment")
            .within(Locator::css("div.group").has_text("My Comment"))
            .tag_js("abc123");
        assert!(js.contains("div.group"), "{js}");
        assert!(js.contains("data-vigil-hit"), "{js}");
        assert!(js.contains("\"abc123\""), "{js}");
    }

    #[test]
    fn hit_selector_round_trips_nonce() {
        assert_eq!(
            Locator::hit_selector("f00"),
            "[data-vigil-hit=\"f00\"]"
        );
    }
}
