use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The user profile document (`users/{uid}`), as cached by the dashboard.
///
/// Created by the sign-up flow. The dashboard only reads it and applies
/// partial updates through [`ProfilePatch`]. Reads are lenient: a field
/// holding an unexpected type falls back to its default instead of failing
/// the whole document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    #[serde(deserialize_with = "lenient::text")]
    pub display_name: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub experience: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub education: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub expected_salary: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub linkedin: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub portfolio: Option<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub expertise: Vec<String>,
    #[serde(rename = "resumeURL", deserialize_with = "lenient::text")]
    pub resume_url: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub resume_name: Option<String>,
    #[serde(deserialize_with = "lenient::count")]
    pub interviews_completed: i64,
}

/// Field readers for documents written by other clients.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn scalar_text(value: Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(scalar_text(Value::deserialize(d)?))
    }

    /// Arrays keep their scalar entries; a bare string is read as
    /// comma-separated text.
    pub fn list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items.into_iter().filter_map(scalar_text).collect(),
            Value::String(s) => super::parse_skills(&s),
            _ => Vec::new(),
        })
    }

    /// Any number, or numeric text, truncated toward zero. Anything else is 0.
    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        let as_float = match Value::deserialize(d)? {
            Value::Number(n) => match n.as_i64() {
                Some(i) => return Ok(i),
                None => n.as_f64(),
            },
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        Ok(as_float.filter(|f| f.is_finite()).map_or(0, |f| f as i64))
    }
}

impl UserProfile {
    pub fn has_resume(&self) -> bool {
        self.resume_url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

/// Editable draft of the profile. Every field is raw text, `skills` included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub display_name: String,
    pub location: String,
    pub experience: String,
    pub education: String,
    pub expected_salary: String,
    pub linkedin: String,
    pub portfolio: String,
    pub skills: String,
}

/// Names of the draft fields, used when the view edits one field at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    DisplayName,
    Location,
    Experience,
    Education,
    ExpectedSalary,
    Linkedin,
    Portfolio,
    Skills,
}

impl FormField {
    /// The document field name this draft field is persisted under.
    pub fn field_name(self) -> &'static str {
        match self {
            FormField::DisplayName => "displayName",
            FormField::Location => "location",
            FormField::Experience => "experience",
            FormField::Education => "education",
            FormField::ExpectedSalary => "expectedSalary",
            FormField::Linkedin => "linkedin",
            FormField::Portfolio => "portfolio",
            FormField::Skills => "skills",
        }
    }
}

impl ProfileForm {
    /// Initializes the draft from the stored profile. Absent fields become
    /// empty strings; skills are joined with `", "`.
    pub fn from_profile(profile: &UserProfile) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            display_name: text(&profile.display_name),
            location: text(&profile.location),
            experience: text(&profile.experience),
            education: text(&profile.education),
            expected_salary: text(&profile.expected_salary),
            linkedin: text(&profile.linkedin),
            portfolio: text(&profile.portfolio),
            skills: join_skills(&profile.skills),
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::DisplayName => self.display_name = value,
            FormField::Location => self.location = value,
            FormField::Experience => self.experience = value,
            FormField::Education => self.education = value,
            FormField::ExpectedSalary => self.expected_salary = value,
            FormField::Linkedin => self.linkedin = value,
            FormField::Portfolio => self.portfolio = value,
            FormField::Skills => self.skills = value,
        }
    }

    /// The full-profile write issued on "Save Changes": all eight editable
    /// fields, with skills parsed out of the raw text.
    pub fn to_patch(&self) -> ProfilePatch {
        ProfilePatch {
            display_name: Some(self.display_name.clone()),
            location: Some(self.location.clone()),
            experience: Some(self.experience.clone()),
            education: Some(self.education.clone()),
            expected_salary: Some(self.expected_salary.clone()),
            linkedin: Some(self.linkedin.clone()),
            portfolio: Some(self.portfolio.clone()),
            skills: Some(parse_skills(&self.skills)),
            ..ProfilePatch::default()
        }
    }
}

/// A partial update of the profile document. `None` fields are neither
/// written nor merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_salary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(rename = "resumeURL", skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_name: Option<String>,
}

impl ProfilePatch {
    pub fn resume_link(url: impl Into<String>) -> Self {
        Self {
            resume_url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn uploaded_resume(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            resume_url: Some(url.into()),
            resume_name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    /// The present fields keyed by document field name.
    pub fn fields(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Document field paths this patch writes, sorted by name.
    pub fn field_paths(&self) -> Vec<String> {
        self.fields().keys().cloned().collect()
    }

    /// Applies the patch to a cached profile in place.
    pub fn apply_to(&self, profile: &mut UserProfile) {
        fn put<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
            if let Some(v) = value {
                *slot = Some(v.clone());
            }
        }
        put(&mut profile.display_name, &self.display_name);
        put(&mut profile.location, &self.location);
        put(&mut profile.experience, &self.experience);
        put(&mut profile.education, &self.education);
        put(&mut profile.expected_salary, &self.expected_salary);
        put(&mut profile.linkedin, &self.linkedin);
        put(&mut profile.portfolio, &self.portfolio);
        put(&mut profile.resume_url, &self.resume_url);
        put(&mut profile.resume_name, &self.resume_name);
        if let Some(skills) = &self.skills {
            profile.skills = skills.clone();
        }
    }
}

/// Merges a written patch into the cached copy. An empty cache becomes a
/// profile holding only the patched fields.
pub fn merge_into_cache(cached: Option<UserProfile>, patch: &ProfilePatch) -> UserProfile {
    let mut profile = cached.unwrap_or_default();
    patch.apply_to(&mut profile);
    profile
}

/// Parses the comma-separated skills text. Entries are trimmed but empty
/// entries are kept; only a completely empty input yields no skills.
pub fn parse_skills(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(',').map(|s| s.trim().to_string()).collect()
}

pub fn join_skills(skills: &[String]) -> String {
    skills.join(", ")
}
