/// Destination for generated text.
///
/// Templates use the protoc printer syntax: `$name$` is replaced by the
/// binding called `name` and `$$` produces a literal dollar sign. The current
/// indentation is applied at the start of every non-empty line.
///
/// Sinks are append-only. Generators never read back what they wrote.
pub trait OutputSink {
    /// Append `template` with every `$var$` substituted from `vars`.
    ///
    /// Referring to a variable that is not bound is a programming error and
    /// panics.
    fn print(&mut self, template: &str, vars: &[(&str, &str)]);

    /// Increase indentation by one level.
    fn indent(&mut self);

    /// Decrease indentation by one level.
    fn outdent(&mut self);
}
