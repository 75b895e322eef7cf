use indexmap::IndexSet;

use crate::traits::OutputSink;

/// Indentation style configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentStyle {
    Spaces(usize),
    Tabs,
}

impl Default for IndentStyle {
    fn default() -> Self {
        IndentStyle::Spaces(2)
    }
}

/// In-memory [`OutputSink`] that accumulates generated text.
#[derive(Debug, Clone)]
pub struct Printer {
    buffer: String,
    /// Current indentation level
    indent_level: usize,
    /// Characters per indent
    indent_width: usize,
    use_tabs: bool,
    at_line_start: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new(IndentStyle::default())
    }
}

impl Printer {
    pub fn new(style: IndentStyle) -> Self {
        let (use_tabs, indent_width) = match style {
            IndentStyle::Spaces(n) => (false, n),
            IndentStyle::Tabs => (true, 1),
        };
        Self {
            buffer: String::new(),
            indent_level: 0,
            indent_width,
            use_tabs,
            at_line_start: true,
        }
    }

    /// Get the current indentation string.
    pub fn indent_string(&self) -> String {
        let unit = if self.use_tabs { "\t" } else { " " };
        unit.repeat(self.indent_level * self.indent_width)
    }

    /// Current indent level.
    pub fn indent_level(&self) -> usize {
        self.indent_level
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn into_string(self) -> String {
        self.buffer
    }

    fn write_text(&mut self, text: &str) {
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                self.buffer.push('\n');
                self.at_line_start = true;
            }
            if line.is_empty() {
                continue;
            }
            if self.at_line_start {
                let indent = self.indent_string();
                self.buffer.push_str(&indent);
                self.at_line_start = false;
            }
            self.buffer.push_str(line);
        }
    }
}

impl OutputSink for Printer {
    fn print(&mut self, template: &str, vars: &[(&str, &str)]) {
        let mut rest = template;
        while let Some(start) = rest.find('$') {
            self.write_text(&rest[..start]);
            let after = &rest[start + 1..];
            let Some(end) = after.find('$') else {
                panic!("unterminated variable in template {template:?}");
            };
            let name = &after[..end];
            if name.is_empty() {
                self.write_text("$");
            } else {
                let value = vars
                    .iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| *value)
                    .unwrap_or_else(|| panic!("template variable ${name}$ is not bound"));
                self.write_text(value);
            }
            rest = &after[end + 1..];
        }
        self.write_text(rest);
    }

    fn indent(&mut self) {
        self.indent_level += 1;
    }

    fn outdent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }
}

/// Set of header paths a generated source file must include.
///
/// Deduplicated and insertion-ordered; [`sorted`](Self::sorted) gives the
/// order headers are written in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSet {
    headers: IndexSet<String>,
}

impl ImportSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header. Returns false if it was already present.
    pub fn insert(&mut self, header: impl Into<String>) -> bool {
        self.headers.insert(header.into())
    }

    pub fn contains(&self, header: &str) -> bool {
        self.headers.contains(header)
    }

    pub fn remove(&mut self, header: &str) -> bool {
        self.headers.shift_remove(header)
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Headers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.headers.iter().map(String::as_str)
    }

    /// Headers in lexical order.
    pub fn sorted(&self) -> Vec<&str> {
        let mut headers: Vec<&str> = self.iter().collect();
        headers.sort_unstable();
        headers
    }
}

impl Extend<String> for ImportSet {
    fn extend<T: IntoIterator<Item = String>>(&mut self, iter: T) {
        self.headers.extend(iter);
    }
}
