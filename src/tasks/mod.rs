//! Test-task catalog: per-profession task metadata and PDF files on disk.

use std::path::PathBuf;

use crate::core::types::Profession;

/// Static description of a profession's test task.
pub struct TaskInfo {
    pub title: &'static str,
    pub description: &'static str,
    pub file_name: &'static str,
}

/// Resolves task files under a base directory configured at startup.
pub struct TaskCatalog {
    dir: PathBuf,
}

impl TaskCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn info_for(profession: Profession) -> TaskInfo {
        match profession {
            Profession::Qa => TaskInfo {
                title: "Тестове завдання для QA",
                description: "Протестуйте невеликий застосунок і оформіть знайдені баги у звіт.",
                file_name: "qa_test_task.pdf",
            },
            Profession::Ba => TaskInfo {
                title: "Тестове завдання для BA",
                description: "Проаналізуйте вимоги до продукту та підготуйте коротку специфікацію.",
                file_name: "ba_test_task.pdf",
            },
        }
    }

    pub fn file_path_for(&self, profession: Profession) -> PathBuf {
        self.dir.join(Self::info_for(profession).file_name)
    }

    pub fn file_exists(&self, profession: Profession) -> bool {
        self.file_path_for(profession).is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn file_paths_are_per_profession() {
        let catalog = TaskCatalog::new("assets/tasks");
        assert_eq!(
            catalog.file_path_for(Profession::Qa),
            PathBuf::from("assets/tasks/qa_test_task.pdf")
        );
        assert_eq!(
            catalog.file_path_for(Profession::Ba),
            PathBuf::from("assets/tasks/ba_test_task.pdf")
        );
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = TaskCatalog::new(dir.path());
        assert!(!catalog.file_exists(Profession::Qa));

        std::fs::write(dir.path().join("qa_test_task.pdf"), b"%PDF-1.4").unwrap();
        assert!(catalog.file_exists(Profession::Qa));
        assert!(!catalog.file_exists(Profession::Ba));
    }
}
