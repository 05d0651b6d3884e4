//! Demo accounts and pairings loaded at startup.

use mentorbridge_auth::PasswordService;
use mentorbridge_common::{AppError, UserRole};

use crate::directory::{Skill, User};

struct DemoUser {
    id: &'static str,
    email: &'static str,
    password: &'static str,
    name: &'static str,
    role: UserRole,
    skills: &'static [&'static str],
    title: Option<&'static str>,
    experience: Option<u32>,
    motto: Option<&'static str>,
    learning_goals: Option<&'static str>,
    availability: &'static str,
    domains: &'static [&'static str],
}

const DEMO_USERS: &[DemoUser] = &[
    DemoUser {
        id: "m1",
        email: "sarah@mentorbridge.com",
        password: "mentor123",
        name: "Sarah Chen",
        role: UserRole::Mentor,
        skills: &["React", "System Design", "Career Growth", "TypeScript"],
        title: Some("Senior Software Engineer @ Google"),
        experience: Some(8),
        motto: Some("Climb step by step, mastery comes from consistency."),
        learning_goals: None,
        availability: "Tue, Thu after 6 PM",
        domains: &["Web Development", "UI/UX Design"],
    },
    DemoUser {
        id: "m2",
        email: "marcus@mentorbridge.com",
        password: "mentor123",
        name: "Marcus Thorne",
        role: UserRole::Mentor,
        skills: &["UI/UX", "Figma", "Design System", "Product Management"],
        title: Some("Product Design Lead @ Airbnb"),
        experience: Some(6),
        motto: Some("Great design is invisible."),
        learning_goals: None,
        availability: "Mondays & Weekends",
        domains: &["UI/UX Design", "Product Management"],
    },
    DemoUser {
        id: "m3",
        email: "elena@mentorbridge.com",
        password: "mentor123",
        name: "Dr. Elena Rodriguez",
        role: UserRole::Mentor,
        skills: &["Python", "Machine Learning", "Data Ethics", "Data Science"],
        title: Some("AI Research Scientist"),
        experience: Some(10),
        motto: Some("AI with ethics builds trust."),
        learning_goals: None,
        availability: "Flexible mornings",
        domains: &["Machine Learning", "Data Science"],
    },
    DemoUser {
        id: "e1",
        email: "alex@mentorbridge.com",
        password: "mentee123",
        name: "Alex Johnson",
        role: UserRole::Mentee,
        skills: &["JavaScript", "React"],
        title: None,
        experience: None,
        motto: None,
        learning_goals: Some("Become a Senior Frontend Engineer"),
        availability: "Weekday evenings",
        domains: &["Web Development", "TypeScript", "Design Systems"],
    },
    DemoUser {
        id: "e2",
        email: "jordan@mentorbridge.com",
        password: "mentee123",
        name: "Jordan Lee",
        role: UserRole::Mentee,
        skills: &["Python", "Basic ML"],
        title: None,
        experience: None,
        motto: None,
        learning_goals: Some("Transition into ML Engineering"),
        availability: "Weekends",
        domains: &["Machine Learning", "Data Science"],
    },
    DemoUser {
        id: "e3",
        email: "sam@mentorbridge.com",
        password: "mentee123",
        name: "Sam Wilson",
        role: UserRole::Mentee,
        skills: &["Figma", "Design Basics"],
        title: None,
        experience: None,
        motto: None,
        learning_goals: Some("Become a Product Designer"),
        availability: "Flexible",
        domains: &["UI/UX Design", "Product Management"],
    },
];

/// Demo pairings: every mentor starts with one mentee.
pub const DEMO_ASSIGNMENTS: [(&str, &str); 3] = [("e1", "m1"), ("e2", "m3"), ("e3", "m2")];

pub fn demo_users(passwords: &PasswordService) -> Result<Vec<User>, AppError> {
    DEMO_USERS
        .iter()
        .map(|demo| {
            let domains: Vec<String> = demo.domains.iter().map(|d| d.to_string()).collect();
            let (domains, preferred_domains) = match demo.role {
                UserRole::Mentor => (domains, Vec::new()),
                UserRole::Mentee => (Vec::new(), domains),
            };

            Ok(User {
                id: demo.id.to_string(),
                email: demo.email.to_string(),
                password_hash: passwords.hash_password(demo.password)?,
                name: demo.name.to_string(),
                role: demo.role,
                skills: demo.skills.iter().map(|s| Skill::tag(*s)).collect(),
                title: demo.title.map(str::to_string),
                experience: demo.experience,
                motto: demo.motto.map(str::to_string),
                learning_goals: demo.learning_goals.map(str::to_string),
                availability: Some(demo.availability.to_string()),
                domains,
                preferred_domains,
            })
        })
        .collect()
}
