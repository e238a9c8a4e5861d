use super::schema::{Question, SurveySchema};

/// Questions addressed to a stakeholder role with the given expertise, in schema order.
///
/// A question is kept when the role is targeted and either the question has no expertise
/// restriction or the respondent holds at least one of the listed tags. Unknown roles
/// yield an empty list.
pub fn select_questions<'a, S>(
    schema: &'a SurveySchema,
    stakeholder_id: &str,
    expertise: &[S],
) -> Vec<&'a Question>
where
    S: AsRef<str>,
{
    schema
        .questions
        .iter()
        .filter(|question| question.targets_stakeholder(stakeholder_id))
        .filter(|question| matches_expertise(question, expertise))
        .collect()
}

fn matches_expertise<S: AsRef<str>>(question: &Question, expertise: &[S]) -> bool {
    match question.target_expertise.as_deref() {
        None | Some([]) => true,
        Some(targets) => targets
            .iter()
            .any(|target| expertise.iter().any(|tag| tag.as_ref() == target)),
    }
}
