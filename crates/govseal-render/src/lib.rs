//! Rendering utilities for review surfaces (Markdown assessments and provenance tables).

#![forbid(unsafe_code)]

mod markdown;
mod model;

pub use markdown::{render_assessment_markdown, render_provenance_markdown};
pub use model::{
    RenderableAssessment, RenderableConflict, RenderableEscalation, RenderableLevel,
    RenderablePolicy, RenderableProvenanceRow,
};
