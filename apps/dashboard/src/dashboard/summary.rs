use std::fmt;

use crate::dashboard::state::ViewState;

const NOT_SET: &str = "Not set";

/// Read-only rendering of the profile panel, with the page's fallbacks
/// applied ("Not set", zero interviews, default avatar letter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSummary {
    pub avatar_initial: char,
    pub display_name: String,
    pub location: String,
    pub experience: String,
    pub education: String,
    pub expected_salary: String,
    pub interviews_completed: i64,
    pub expertise: Vec<String>,
    pub skills: Vec<String>,
    pub resume: Option<ResumeLink>,
    pub resume_link_label: &'static str,
    pub linkedin: Option<String>,
    pub portfolio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeLink {
    pub url: String,
    pub name: Option<String>,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

impl ProfileSummary {
    pub fn from_view(state: &ViewState) -> Self {
        let profile = state.profile.as_ref();
        let text = |pick: fn(&crate::models::UserProfile) -> Option<&String>| {
            non_empty(profile.and_then(pick))
                .unwrap_or(NOT_SET)
                .to_string()
        };

        let avatar_initial = non_empty(profile.and_then(|p| p.display_name.as_ref()))
            .or_else(|| non_empty(state.user.as_ref().and_then(|u| u.email.as_ref())))
            .and_then(|s| s.chars().next())
            .unwrap_or('U');

        let resume = non_empty(profile.and_then(|p| p.resume_url.as_ref())).map(|url| ResumeLink {
            url: url.to_string(),
            name: non_empty(profile.and_then(|p| p.resume_name.as_ref())).map(str::to_string),
        });

        Self {
            avatar_initial,
            display_name: text(|p| p.display_name.as_ref()),
            location: text(|p| p.location.as_ref()),
            experience: text(|p| p.experience.as_ref()),
            education: text(|p| p.education.as_ref()),
            expected_salary: text(|p| p.expected_salary.as_ref()),
            interviews_completed: profile.map(|p| p.interviews_completed).unwrap_or(0),
            expertise: profile.map(|p| p.expertise.clone()).unwrap_or_default(),
            skills: profile.map(|p| p.skills.clone()).unwrap_or_default(),
            resume_link_label: if resume.is_some() {
                "Update Resume Link"
            } else {
                "Add Resume Link"
            },
            resume,
            linkedin: non_empty(profile.and_then(|p| p.linkedin.as_ref())).map(str::to_string),
            portfolio: non_empty(profile.and_then(|p| p.portfolio.as_ref())).map(str::to_string),
        }
    }
}

fn list(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        empty.to_string()
    } else {
        items.join(", ")
    }
}

impl fmt::Display for ProfileSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}] {}", self.avatar_initial, self.display_name)?;
        writeln!(f, "  Location:            {}", self.location)?;
        writeln!(f, "  Experience:          {}", self.experience)?;
        writeln!(f, "  Education:           {}", self.education)?;
        writeln!(f, "  Expected salary:     {}", self.expected_salary)?;
        writeln!(f, "  Interviews completed: {}", self.interviews_completed)?;
        writeln!(f, "  Expertise:           {}", list(&self.expertise, "No expertise added yet"))?;
        writeln!(f, "  Skills:              {}", list(&self.skills, "No skills added yet"))?;
        match &self.resume {
            Some(ResumeLink { url, name: Some(name) }) => {
                writeln!(f, "  Resume:              {url} ({name})")?
            }
            Some(ResumeLink { url, name: None }) => writeln!(f, "  Resume:              {url}")?,
            None => writeln!(f, "  Resume:              none")?,
        }
        if self.linkedin.is_none() && self.portfolio.is_none() {
            write!(f, "  Links:               No links added")
        } else {
            if let Some(linkedin) = &self.linkedin {
                writeln!(f, "  LinkedIn:            {linkedin}")?;
            }
            match &self.portfolio {
                Some(portfolio) => write!(f, "  Portfolio:           {portfolio}"),
                None => Ok(()),
            }
        }
    }
}
