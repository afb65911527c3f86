use campus_api::models::{Grade, Section, Subject};
use campus_api::{GradeKey, SectionId, SubjectId};
use strum::Display;

/// Which level of the hierarchy an item lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ItemKind {
    Grade,
    Section,
    Subject,
}

/// A node of the grade tree that can be renamed or deleted.
///
/// Grades are addressed by name; sections and subjects by id. The owning
/// grade travels with children because subject deletion is scoped to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcademicItem {
    Grade {
        key: GradeKey,
    },
    Section {
        grade: GradeKey,
        id: SectionId,
        name: String,
    },
    Subject {
        grade: GradeKey,
        id: SubjectId,
        name: String,
    },
}

impl AcademicItem {
    pub fn grade(grade: &Grade) -> Self {
        Self::Grade {
            key: grade.name.clone(),
        }
    }

    pub fn section(grade: &Grade, section: &Section) -> Self {
        Self::Section {
            grade: grade.name.clone(),
            id: section.id,
            name: section.name.clone(),
        }
    }

    pub fn subject(grade: &Grade, subject: &Subject) -> Self {
        Self::Subject {
            grade: grade.name.clone(),
            id: subject.id,
            name: subject.name.clone(),
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Grade { .. } => ItemKind::Grade,
            Self::Section { .. } => ItemKind::Section,
            Self::Subject { .. } => ItemKind::Subject,
        }
    }

    /// Current display name.
    pub fn label(&self) -> &str {
        match self {
            Self::Grade { key } => key.as_str(),
            Self::Section { name, .. } | Self::Subject { name, .. } => name,
        }
    }

    /// The grade this item belongs to (itself for grades).
    pub fn owning_grade(&self) -> &GradeKey {
        match self {
            Self::Grade { key } => key,
            Self::Section { grade, .. } | Self::Subject { grade, .. } => grade,
        }
    }
}

impl std::fmt::Display for AcademicItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} \"{}\"", self.kind(), self.label())
    }
}
