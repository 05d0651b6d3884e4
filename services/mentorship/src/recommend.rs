use serde::Serialize;

use crate::directory::User;

/// Number of mentee skills a mentor has to cover to be recommended.
pub const MIN_SKILL_MATCHES: usize = 2;

/// Counts the mentee skills the mentor holds at an equal or higher level.
pub fn match_score(mentee: &User, mentor: &User) -> usize {
    mentee
        .skills
        .iter()
        .filter(|skill| {
            mentor
                .skill_level(&skill.name)
                .is_some_and(|level| level >= skill.level)
        })
        .count()
}

/// Mentors covering at least [`MIN_SKILL_MATCHES`] of the mentee's skills, in candidate order.
pub fn recommend<'a, I>(mentee: &User, mentors: I) -> Vec<&'a User>
where
    I: IntoIterator<Item = &'a User>,
{
    mentors
        .into_iter()
        .filter(|mentor| match_score(mentee, mentor) >= MIN_SKILL_MATCHES)
        .collect()
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SkillGap {
    pub name: String,
    pub mentee_level: u8,
    pub mentor_level: u8,
    pub gap: u8,
}

/// Per mentee skill, how far the mentor is ahead. Missing mentor skills count as level 0.
pub fn skill_gap(mentee: &User, mentor: &User) -> Vec<SkillGap> {
    mentee
        .skills
        .iter()
        .map(|skill| {
            let mentor_level = mentor.skill_level(&skill.name).unwrap_or(0);
            SkillGap {
                name: skill.name.clone(),
                mentee_level: skill.level,
                mentor_level,
                gap: mentor_level.saturating_sub(skill.level),
            }
        })
        .collect()
}
