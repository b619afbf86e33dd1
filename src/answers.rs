use serde::Deserialize;

use crate::lesson::Lesson;

/// Hand-written answers, one list per task in task order, one item per question.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnswerKey {
    #[serde(default)]
    pub tasks: Vec<Vec<KeyedAnswer>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeyedAnswer {
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub translation: String,
}

/// Copy key values onto matching questions. Positions beyond the lesson's
/// tasks or questions are ignored, as are empty key values. Returns the
/// number of questions touched.
pub fn apply(lesson: &mut Lesson, key: &AnswerKey) -> usize {
    let mut touched = 0;
    for (task, answers) in lesson.fill_in_the_blanks.tasks.iter_mut().zip(&key.tasks) {
        for (question, keyed) in task.questions.iter_mut().zip(answers) {
            let mut changed = false;
            if !keyed.answer.is_empty() {
                question.answer = keyed.answer.clone();
                changed = true;
            }
            if !keyed.translation.is_empty() {
                question.translation = keyed.translation.clone();
                changed = true;
            }
            if changed {
                touched += 1;
            }
        }
    }
    touched
}
