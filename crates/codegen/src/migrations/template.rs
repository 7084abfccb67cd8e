//! # Migration Stubs
//!
//! Stub files are plain text with named slots written as `{{name}}`. A stub
//! is parsed once into text and slot segments; rendering requires a value for
//! every slot the stub declares, accepts each value once, and rejects values
//! for slots the stub does not have. A slot may appear several times in the
//! text (the create stub names its table twice) and is filled from the one
//! supplied value.

use schemer_core::{EngineError, EngineResult};

const CREATE_STUB: &str = include_str!("../../stubs/create.stub");
const RELATIONS_STUB: &str = include_str!("../../stubs/relations.stub");

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

// ============================================================================
// TemplateKind
// ============================================================================

/// The stubs shipped with the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// `Schema::create` migration for one table
    CreateTable,
    /// `Schema::table` migration adding foreign keys
    Relations,
}

impl TemplateKind {
    /// Stub name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            TemplateKind::CreateTable => "create.stub",
            TemplateKind::Relations => "relations.stub",
        }
    }

    /// Raw stub text
    pub fn source(&self) -> &'static str {
        match self {
            TemplateKind::CreateTable => CREATE_STUB,
            TemplateKind::Relations => RELATIONS_STUB,
        }
    }

    /// Slots the stub is expected to declare
    pub fn slots(&self) -> &'static [&'static str] {
        match self {
            TemplateKind::CreateTable => &["class", "table", "columns"],
            TemplateKind::Relations => &["class", "apply", "revert"],
        }
    }
}

// ============================================================================
// Template
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Slot(String),
}

/// A parsed stub
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    segments: Vec<Segment>,
    /// Distinct slot names in order of first appearance
    slots: Vec<String>,
}

impl Template {
    /// Parse stub text.
    ///
    /// Fails on an unterminated `{{` or an empty slot name.
    pub fn parse(name: impl Into<String>, source: &str) -> EngineResult<Self> {
        let name = name.into();
        let mut segments = Vec::new();
        let mut slots: Vec<String> = Vec::new();
        let mut rest = source;

        while let Some(start) = rest.find(OPEN) {
            if start > 0 {
                segments.push(Segment::Text(rest[..start].to_string()));
            }

            let after_open = &rest[start + OPEN.len()..];
            let end = after_open
                .find(CLOSE)
                .ok_or_else(|| EngineError::template(&name, "unterminated slot"))?;

            let slot = after_open[..end].trim();
            if slot.is_empty() {
                return Err(EngineError::template(&name, "empty slot name"));
            }
            if !slots.iter().any(|s| s == slot) {
                slots.push(slot.to_string());
            }
            segments.push(Segment::Slot(slot.to_string()));

            rest = &after_open[end + CLOSE.len()..];
        }

        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_string()));
        }

        Ok(Self {
            name,
            segments,
            slots,
        })
    }

    /// Load one of the bundled stubs and check it declares exactly the
    /// slots the generator fills.
    pub fn bundled(kind: TemplateKind) -> EngineResult<Self> {
        let template = Self::parse(kind.name(), kind.source())?;

        let expected = kind.slots();
        if template.slots.len() != expected.len()
            || !expected.iter().all(|s| template.has_slot(s))
        {
            return Err(EngineError::template(
                kind.name(),
                format!(
                    "declares slots [{}], expected [{}]",
                    template.slots.join(", "),
                    expected.join(", ")
                ),
            ));
        }

        Ok(template)
    }

    /// Template name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Distinct slot names
    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    /// Check whether the template declares a slot
    pub fn has_slot(&self, slot: &str) -> bool {
        self.slots.iter().any(|s| s == slot)
    }

    /// Fill every slot.
    ///
    /// Values are inserted verbatim; they are never scanned for slots.
    pub fn render(&self, values: &[(&str, &str)]) -> EngineResult<String> {
        for (i, (slot, _)) in values.iter().enumerate() {
            if !self.has_slot(slot) {
                return Err(EngineError::template(
                    &self.name,
                    format!("unknown slot '{}'", slot),
                ));
            }
            if values[..i].iter().any(|(earlier, _)| *earlier == *slot) {
                return Err(EngineError::template(
                    &self.name,
                    format!("slot '{}' supplied twice", slot),
                ));
            }
        }

        if let Some(missing) = self
            .slots
            .iter()
            .find(|slot| !values.iter().any(|(s, _)| *s == slot.as_str()))
        {
            return Err(EngineError::template(
                &self.name,
                format!("slot '{}' was not filled", missing),
            ));
        }

        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Slot(slot) => {
                    if let Some((_, value)) = values.iter().find(|(s, _)| *s == slot.as_str()) {
                        out.push_str(value);
                    }
                }
            }
        }

        Ok(out)
    }
}

// ============================================================================
// Tests
// ============================================================================
