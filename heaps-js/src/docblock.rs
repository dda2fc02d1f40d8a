/// The directives extracted from the leading comment of a file.
///
/// Produced by the parser; the module graph only ever asks three questions of
/// it, so the rest of the parsed directives stay with the parser's own
/// representation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Docblock {
  provides_module: Option<String>,
  typed: bool,
  declaration: bool,
}

impl Docblock {
  pub fn new(provides_module: Option<String>, typed: bool, declaration: bool) -> Docblock {
    Docblock {
      provides_module,
      typed,
      declaration,
    }
  }

  /// The module name declared by a `@providesModule` directive, if any.
  pub fn provides_module(&self) -> Option<&str> {
    self.provides_module.as_deref()
  }

  /// Whether the file opts into checking via the language pragma.
  pub fn is_typed(&self) -> bool {
    self.typed
  }

  /// Whether the file is a declaration file.
  pub fn is_declaration_file(&self) -> bool {
    self.declaration
  }
}
