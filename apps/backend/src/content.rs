//! Course content loading.
//!
//! Lessons are authored as a single JSON document; the server reads it once
//! at startup. Learner-specific flags inside it (locks, stars) are the
//! authored initial state of the course graph.

use std::fs;
use std::path::Path;

use anyhow::Context;

use lingua_core::Course;

/// Load the course graph from an authored JSON file.
pub fn load_course(path: &Path) -> anyhow::Result<Course> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read course content at {}", path.display()))?;
    let course: Course = serde_json::from_str(&raw)
        .with_context(|| format!("malformed course content in {}", path.display()))?;
    Ok(course)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn loads_a_minimal_course() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "sections": [{{
                    "id": "s1",
                    "title": "Basics",
                    "description": "First steps",
                    "lessons": [{{
                        "id": "l1",
                        "level": "A1",
                        "title": "Greetings",
                        "description": "Say hello",
                        "locked": false,
                        "completed": false,
                        "stars": 0
                    }}]
                }}]
            }}"#
        )
        .unwrap();

        let course = load_course(file.path()).unwrap();
        assert_eq!(course.sections.len(), 1);
        let lesson = course.find_lesson("l1").unwrap();
        assert!(lesson.vocabulary.is_empty());
        assert!(lesson.exercises.is_empty());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_course(Path::new("does/not/exist.json")).is_err());
    }
}
