use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use mentorbridge_common::{AppError, UserRole};

/// Proficiency assumed for a skill given as a bare tag.
pub const DEFAULT_SKILL_LEVEL: u8 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "SkillInput")]
pub struct Skill {
    pub name: String,
    pub level: u8,
}

impl Skill {
    pub fn new(name: impl Into<String>, level: u8) -> Self {
        Self {
            name: name.into(),
            level,
        }
    }

    pub fn tag(name: impl Into<String>) -> Self {
        Self::new(name, DEFAULT_SKILL_LEVEL)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SkillInput {
    Tag(String),
    Leveled { name: String, level: Option<u8> },
}

impl From<SkillInput> for Skill {
    fn from(input: SkillInput) -> Self {
        match input {
            SkillInput::Tag(name) => Skill::tag(name),
            SkillInput::Leveled { name, level } => {
                Skill::new(name, level.unwrap_or(DEFAULT_SKILL_LEVEL))
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SkillsInput {
    List(Vec<Skill>),
    Levels(BTreeMap<String, u8>),
}

/// Accepts either a list of skills or a `{ "name": level }` object.
fn deserialize_skills<'de, D>(deserializer: D) -> Result<Option<Vec<Skill>>, D::Error>
where
    D: Deserializer<'de>,
{
    let input = Option::<SkillsInput>::deserialize(deserializer)?;
    Ok(input.map(|skills| match skills {
        SkillsInput::List(list) => list,
        SkillsInput::Levels(levels) => levels
            .into_iter()
            .map(|(name, level)| Skill::new(name, level))
            .collect(),
    }))
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: UserRole,
    pub skills: Vec<Skill>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motto: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning_goals: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub domains: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub preferred_domains: Vec<String>,
}

impl User {
    pub fn skill_level(&self, name: &str) -> Option<u8> {
        self.skills
            .iter()
            .find(|skill| skill.name == name)
            .map(|skill| skill.level)
    }
}

/// Mutable profile fields; anything left `None` is kept as is.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileFields {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_skills")]
    pub skills: Option<Vec<Skill>>,
    pub title: Option<String>,
    pub experience: Option<u32>,
    pub motto: Option<String>,
    pub learning_goals: Option<String>,
    pub availability: Option<String>,
    pub domains: Option<Vec<String>>,
    pub preferred_domains: Option<Vec<String>>,
}

impl ProfileFields {
    pub fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(skills) = self.skills {
            user.skills = skills;
        }
        if self.title.is_some() {
            user.title = self.title;
        }
        if self.experience.is_some() {
            user.experience = self.experience;
        }
        if self.motto.is_some() {
            user.motto = self.motto;
        }
        if self.learning_goals.is_some() {
            user.learning_goals = self.learning_goals;
        }
        if self.availability.is_some() {
            user.availability = self.availability;
        }
        if let Some(domains) = self.domains {
            user.domains = domains;
        }
        if let Some(preferred) = self.preferred_domains {
            user.preferred_domains = preferred;
        }
    }
}

/// In-memory user store. Ids are never reused or changed once issued.
#[derive(Debug, Default)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    pub fn get(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn find_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|u| u.email == email)
    }

    pub fn list_by_role(&self, role: UserRole) -> Vec<&User> {
        self.users.iter().filter(|u| u.role == role).collect()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Next free id for `role`: prefix plus role count offset by the seed size.
    pub fn next_id(&self, role: UserRole) -> String {
        let mut n = self.list_by_role(role).len() + 4;
        loop {
            let candidate = format!("{}{}", role.id_prefix(), n);
            if self.get(&candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }

    pub fn insert(&mut self, user: User) -> Result<&User, AppError> {
        if self.find_by_email(&user.email).is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }
        if self.get(&user.id).is_some() {
            return Err(AppError::Conflict(format!("User id {} already taken", user.id)));
        }

        self.users.push(user);
        let last = self.users.len() - 1;
        Ok(&self.users[last])
    }

    pub fn update_profile(
        &mut self,
        id: &str,
        fields: ProfileFields,
        password_hash: Option<String>,
    ) -> Result<&User, AppError> {
        let user = self
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        fields.apply(user);
        if let Some(hash) = password_hash {
            user.password_hash = hash;
        }

        Ok(user)
    }
}
