use spot_core::InstrumentDefinition;

/// Producer of instrument definitions (files, fixtures, ...)
///
/// Structural problems with the underlying source yield an empty list; they
/// are reported through logging, never returned.
pub trait DefinitionSource {
    fn definitions(&self) -> Vec<InstrumentDefinition>;

    /// Short description of where the definitions come from
    fn describe(&self) -> String {
        "definition source".to_string()
    }
}

impl DefinitionSource for Vec<InstrumentDefinition> {
    fn definitions(&self) -> Vec<InstrumentDefinition> {
        self.clone()
    }

    fn describe(&self) -> String {
        format!("{} inline definitions", self.len())
    }
}
