//! Course graph: lesson completion, stars, and the unlock flow.

use serde::{Deserialize, Serialize};

use crate::types::{Lesson, Section};

/// Score above which a completed lesson earns the full three stars.
pub const THREE_STAR_SCORE: u32 = 50;

/// The full ordered content graph. Section order defines the unlock
/// topology: finishing the last lesson of a section opens the next one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub sections: Vec<Section>,
}

impl Course {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    /// Locate a lesson by id as (section index, lesson index).
    pub fn locate(&self, lesson_id: &str) -> Option<(usize, usize)> {
        self.sections.iter().enumerate().find_map(|(s, section)| {
            section
                .lessons
                .iter()
                .position(|lesson| lesson.id == lesson_id)
                .map(|l| (s, l))
        })
    }

    pub fn find_lesson(&self, lesson_id: &str) -> Option<&Lesson> {
        self.locate(lesson_id)
            .map(|(s, l)| &self.sections[s].lessons[l])
    }

    /// Apply a finished practice session's score to the graph.
    ///
    /// Marks the lesson completed, raises its stars (never lowers them) and
    /// unlocks the next lesson in the section, or the first lesson of the
    /// next section at a section boundary. An unknown id is silently
    /// ignored; nothing is mutated.
    pub fn apply_completion(&mut self, lesson_id: &str, score: u32) {
        let Some((section_index, lesson_index)) = self.locate(lesson_id) else {
            return;
        };

        let earned = if score > THREE_STAR_SCORE { 3 } else { 1 };
        let lesson = &mut self.sections[section_index].lessons[lesson_index];
        lesson.completed = true;
        lesson.stars = lesson.stars.max(earned);

        if let Some(next) = self.sections[section_index]
            .lessons
            .get_mut(lesson_index + 1)
        {
            next.locked = false;
        } else if let Some(first) = self
            .sections
            .get_mut(section_index + 1)
            .and_then(|section| section.lessons.first_mut())
        {
            first.locked = false;
        }
    }
}
