// Expand/collapse and search state for the grade tree.

use std::collections::HashSet;

use campus_api::models::{Grade, Section, SectionStudent, Subject};
use campus_api::{GradeKey, SectionId};

use super::item::AcademicItem;

/// Case-insensitive match on the grade name or any of its section names.
pub fn matches_search(grade: &Grade, query: &str) -> bool {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return true;
    }
    grade.name.as_str().to_lowercase().contains(&needle)
        || grade
            .sections
            .iter()
            .any(|s| s.name.to_lowercase().contains(&needle))
}

/// A visible line of the tree.
#[derive(Debug, Clone, Copy)]
pub enum TreeRow<'a> {
    Grade(&'a Grade),
    Section(&'a Grade, &'a Section),
    Student(&'a Section, &'a SectionStudent),
    Subject(&'a Grade, &'a Subject),
}

impl TreeRow<'_> {
    pub fn depth(&self) -> usize {
        match self {
            Self::Grade(_) => 0,
            Self::Section(..) | Self::Subject(..) => 1,
            Self::Student(..) => 2,
        }
    }

    /// Editable item behind the row; students are read-only.
    pub fn item(&self) -> Option<AcademicItem> {
        match *self {
            Self::Grade(grade) => Some(AcademicItem::grade(grade)),
            Self::Section(grade, section) => Some(AcademicItem::section(grade, section)),
            Self::Subject(grade, subject) => Some(AcademicItem::subject(grade, subject)),
            Self::Student(..) => None,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct TreeState {
    expanded_grades: HashSet<GradeKey>,
    expanded_sections: HashSet<SectionId>,
    search: String,
}

impl TreeState {
    /// Collapse everything except the first grade and its first section.
    pub fn reset_defaults(&mut self, grades: &[Grade]) {
        self.expanded_grades.clear();
        self.expanded_sections.clear();
        if let Some(first) = grades.first() {
            self.expanded_grades.insert(first.name.clone());
            if let Some(section) = first.sections.first() {
                self.expanded_sections.insert(section.id);
            }
        }
    }

    pub fn toggle_grade(&mut self, key: &GradeKey) {
        if !self.expanded_grades.remove(key) {
            self.expanded_grades.insert(key.clone());
        }
    }

    pub fn toggle_section(&mut self, id: SectionId) {
        if !self.expanded_sections.remove(&id) {
            self.expanded_sections.insert(id);
        }
    }

    pub fn is_grade_expanded(&self, key: &GradeKey) -> bool {
        self.expanded_grades.contains(key)
    }

    pub fn is_section_expanded(&self, id: SectionId) -> bool {
        self.expanded_sections.contains(&id)
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    pub fn filter<'a>(&self, grades: &'a [Grade]) -> Vec<&'a Grade> {
        grades
            .iter()
            .filter(|g| matches_search(g, &self.search))
            .collect()
    }

    /// Flatten the filtered tree into the rows currently visible.
    pub fn visible_rows<'a>(&self, grades: &'a [Grade]) -> Vec<TreeRow<'a>> {
        let mut rows = Vec::new();
        for grade in self.filter(grades) {
            rows.push(TreeRow::Grade(grade));
            if !self.is_grade_expanded(&grade.name) {
                continue;
            }
            for section in &grade.sections {
                rows.push(TreeRow::Section(grade, section));
                if self.is_section_expanded(section.id) {
                    rows.extend(section.students.iter().map(|s| TreeRow::Student(section, s)));
                }
            }
            rows.extend(grade.subjects.iter().map(|s| TreeRow::Subject(grade, s)));
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use campus_api::StudentId;
    use pretty_assertions::assert_eq;

    use super::*;

    fn section(id: u64, name: &str) -> Section {
        Section {
            id: SectionId(id),
            name: name.into(),
            students_count: 1,
            students: vec![SectionStudent {
                id: StudentId(id * 10),
                name: format!("Student {id}"),
            }],
        }
    }

    fn grades() -> Vec<Grade> {
        vec![
            Grade {
                name: GradeKey::from("9th"),
                sections: vec![section(1, "Alpha"), section(2, "Beta")],
                subjects: vec![Subject {
                    id: campus_api::SubjectId(7),
                    name: "Physics".into(),
                    code: None,
                }],
            },
            Grade {
                name: GradeKey::from("10th"),
                sections: vec![section(3, "Gamma")],
                subjects: vec![],
            },
        ]
    }

    #[test]
    fn defaults_expand_first_grade_and_section_only() {
        let grades = grades();
        let mut tree = TreeState::default();
        tree.toggle_grade(&GradeKey::from("10th"));
        tree.reset_defaults(&grades);

        assert!(tree.is_grade_expanded(&GradeKey::from("9th")));
        assert!(!tree.is_grade_expanded(&GradeKey::from("10th")));
        assert!(tree.is_section_expanded(SectionId(1)));
        assert!(!tree.is_section_expanded(SectionId(2)));
        assert!(!tree.is_section_expanded(SectionId(3)));
    }

    #[test]
    fn search_matches_grade_or_section_names() {
        let grades = grades();
        let mut tree = TreeState::default();

        tree.set_search("GAMMA");
        let names: Vec<&str> = tree.filter(&grades).iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["10th"]);

        tree.set_search("9T");
        assert_eq!(tree.filter(&grades).len(), 1);

        // Subjects are not searched.
        tree.set_search("physics");
        assert!(tree.filter(&grades).is_empty());

        // The query is matched as typed, blanks included.
        tree.set_search("  ");
        assert!(tree.filter(&grades).is_empty());
    }

    #[test]
    fn visible_rows_follow_expansion() {
        let grades = grades();
        let mut tree = TreeState::default();
        tree.reset_defaults(&grades);

        let depths: Vec<usize> = tree.visible_rows(&grades).iter().map(TreeRow::depth).collect();
        // 9th, Alpha, student, Beta, Physics, 10th
        assert_eq!(depths, vec![0, 1, 2, 1, 1, 0]);

        tree.toggle_grade(&GradeKey::from("9th"));
        assert_eq!(tree.visible_rows(&grades).len(), 2);
    }

    #[test]
    fn student_rows_have_no_item() {
        let grades = grades();
        let mut tree = TreeState::default();
        tree.reset_defaults(&grades);
        let rows = tree.visible_rows(&grades);
        assert!(rows[2].item().is_none());
        assert!(matches!(rows[1].item(), Some(AcademicItem::Section { .. })));
    }
}
