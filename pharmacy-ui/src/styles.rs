#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{JsCast, JsValue};
#[cfg(target_arch = "wasm32")]
use web_sys::{Document, Node};

#[cfg(target_arch = "wasm32")]
const STYLE_TAG_SELECTOR: &str = "style[data-pharmacy-ui]";

/// Default CSS for the dashboard along with easy-to-override design tokens.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub const DEFAULT_STYLES: &str = r#"
:root {
  --pharmacy-font-family: 'Inter', system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
  --pharmacy-bg: #f8fafc;
  --pharmacy-card-bg: #ffffff;
  --pharmacy-card-border: rgba(148, 163, 184, 0.28);
  --pharmacy-radius: 16px;
  --pharmacy-text: #1f2933;
  --pharmacy-muted: #52606d;
  --pharmacy-heading: #11181c;
  --pharmacy-primary: #2563eb;
  --pharmacy-primary-bg: rgba(37, 99, 235, 0.12);
  --pharmacy-critical: #b42318;
  --pharmacy-critical-bg: rgba(180, 35, 24, 0.1);
  --pharmacy-warning: #b54708;
  --pharmacy-warning-bg: rgba(220, 104, 3, 0.14);
  --pharmacy-success: #047857;
  --pharmacy-success-bg: rgba(16, 185, 129, 0.14);
  --pharmacy-secondary: #475467;
  --pharmacy-secondary-bg: rgba(71, 84, 103, 0.12);
}

.pharmacy-root {
  font-family: var(--pharmacy-font-family);
  background: var(--pharmacy-bg);
  color: var(--pharmacy-text);
  display: grid;
  grid-template-columns: 220px minmax(0, 1fr);
  min-height: 100vh;
}

.pharmacy-nav {
  display: flex;
  flex-direction: column;
  gap: 6px;
  padding: 24px 16px;
  background: var(--pharmacy-card-bg);
  border-right: 1px solid var(--pharmacy-card-border);
}

.pharmacy-nav h1 {
  font-size: 1.1rem;
  color: var(--pharmacy-heading);
  margin: 0 0 18px;
}

.nav-item {
  border: none;
  background: transparent;
  text-align: left;
  padding: 10px 12px;
  border-radius: 10px;
  font: inherit;
  color: var(--pharmacy-muted);
  cursor: pointer;
}

.nav-item.is-active {
  background: var(--pharmacy-primary-bg);
  color: var(--pharmacy-primary);
  font-weight: 600;
}

.pharmacy-main {
  padding: 28px;
  display: flex;
  flex-direction: column;
  gap: 20px;
}

.section-header {
  display: flex;
  justify-content: space-between;
  align-items: flex-end;
  gap: 12px;
}

.section-header h2 {
  margin: 0;
  color: var(--pharmacy-heading);
}

.section-header p {
  margin: 4px 0 0;
  color: var(--pharmacy-muted);
}

.card {
  background: var(--pharmacy-card-bg);
  border: 1px solid var(--pharmacy-card-border);
  border-radius: var(--pharmacy-radius);
  padding: 18px;
  box-shadow: 0 12px 24px rgba(15, 23, 42, 0.05);
}

.card[data-level="critical"] {
  border-color: var(--pharmacy-critical);
  background: var(--pharmacy-critical-bg);
}

.card[data-level="warning"] {
  border-color: rgba(220, 104, 3, 0.3);
}

.card-grid {
  display: grid;
  gap: 16px;
  grid-template-columns: repeat(auto-fill, minmax(260px, 1fr));
}

.stat-grid {
  display: grid;
  gap: 16px;
  grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
}

.stat-value {
  font-size: 1.8rem;
  font-weight: 700;
  font-variant-numeric: tabular-nums;
}

.stat-caption {
  color: var(--pharmacy-muted);
  font-size: 0.85rem;
}

.badge {
  display: inline-flex;
  align-items: center;
  border-radius: 999px;
  padding: 2px 10px;
  font-size: 0.75rem;
  font-weight: 600;
  background: var(--pharmacy-secondary-bg);
  color: var(--pharmacy-secondary);
}

.badge[data-level="critical"],
.badge[data-level="destructive"] {
  background: var(--pharmacy-critical-bg);
  color: var(--pharmacy-critical);
}

.badge[data-level="warning"] {
  background: var(--pharmacy-warning-bg);
  color: var(--pharmacy-warning);
}

.badge[data-level="success"] {
  background: var(--pharmacy-success-bg);
  color: var(--pharmacy-success);
}

.toolbar {
  display: flex;
  flex-wrap: wrap;
  gap: 10px;
  align-items: center;
}

.toolbar input[type="search"],
.toolbar select,
.form-grid input,
.form-grid select,
.form-grid textarea,
.line-item input {
  font: inherit;
  padding: 8px 12px;
  border-radius: 10px;
  border: 1px solid var(--pharmacy-card-border);
  background: #ffffff;
}

.toolbar input[type="search"] {
  flex: 1 1 260px;
}

.button {
  font: inherit;
  border-radius: 10px;
  border: 1px solid var(--pharmacy-card-border);
  background: #ffffff;
  padding: 8px 14px;
  cursor: pointer;
}

.button.primary {
  background: var(--pharmacy-primary);
  border-color: var(--pharmacy-primary);
  color: #ffffff;
}

.button:disabled {
  opacity: 0.55;
  cursor: progress;
}

.row-list {
  list-style: none;
  margin: 0;
  padding: 0;
  display: flex;
  flex-direction: column;
  gap: 12px;
}

.row-meta {
  display: flex;
  flex-wrap: wrap;
  gap: 8px;
  align-items: center;
  color: var(--pharmacy-muted);
  font-size: 0.85rem;
}

.empty-state {
  color: var(--pharmacy-muted);
  text-align: center;
  padding: 32px;
}

.loading {
  color: var(--pharmacy-muted);
  font-style: italic;
}

.notice {
  display: flex;
  justify-content: space-between;
  gap: 12px;
  border-radius: 12px;
  padding: 12px 16px;
  background: var(--pharmacy-success-bg);
  color: var(--pharmacy-success);
}

.notice[data-level="error"] {
  background: var(--pharmacy-critical-bg);
  color: var(--pharmacy-critical);
}

.form-grid {
  display: grid;
  gap: 14px;
  grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
}

.form-grid label {
  display: flex;
  flex-direction: column;
  gap: 6px;
  font-size: 0.85rem;
  color: var(--pharmacy-muted);
}

.line-item[data-insufficient="true"] {
  outline: 1px solid var(--pharmacy-critical);
  border-radius: 10px;
  padding: 6px;
}
"#;

#[cfg(target_arch = "wasm32")]
pub fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    if document.query_selector(STYLE_TAG_SELECTOR)?.is_some() {
        return Ok(());
    }

    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("Document không có thẻ <head>"))?;

    let style_el = document.create_element("style")?;
    style_el.set_attribute("data-pharmacy-ui", "v1")?;
    style_el.set_text_content(Some(DEFAULT_STYLES));
    head.append_child(&style_el.clone().dyn_into::<Node>()?)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::DEFAULT_STYLES;

    const MARKUP: [&str; 6] = [
        include_str!("app.rs"),
        include_str!("views/alerts.rs"),
        include_str!("views/dashboard.rs"),
        include_str!("views/inventory.rs"),
        include_str!("views/new_order.rs"),
        include_str!("views/orders.rs"),
    ];

    fn selector_classes() -> Vec<&'static str> {
        let mut classes: Vec<&str> = DEFAULT_STYLES
            .split('.')
            .skip(1)
            .filter_map(|chunk| {
                let end = chunk
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
                    .unwrap_or(chunk.len());
                let name = &chunk[..end];
                name.starts_with(|c: char| c.is_ascii_alphabetic()).then_some(name)
            })
            .collect();
        classes.sort_unstable();
        classes.dedup();
        classes
    }

    fn renders_class(source: &str, class: &str) -> bool {
        source.contains(&format!("\"{class}\""))
            || source.split("class=\"").skip(1).any(|rest| {
                rest.split('"')
                    .next()
                    .is_some_and(|attr| attr.split_whitespace().any(|token| token == class))
            })
    }

    #[test]
    fn every_styled_class_is_rendered() {
        let classes = selector_classes();
        assert!(classes.contains(&"line-item"));
        for class in classes {
            assert!(
                MARKUP.iter().any(|source| renders_class(source, class)),
                "lớp CSS `{class}` không được view nào dùng"
            );
        }
    }

    #[test]
    fn insufficient_line_rule_matches_rendered_attribute() {
        assert!(DEFAULT_STYLES.contains(".line-item[data-insufficient=\"true\"]"));
        assert!(MARKUP[4].contains("data-insufficient={(!in_stock).to_string()}"));
    }
}
