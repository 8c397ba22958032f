use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Candidate identifier as issued by the ranking service.
/// The service emits either integers or strings; both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CandidateId(pub String);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CandidateId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => CandidateId(s),
            Raw::Number(n) => CandidateId(n.to_string()),
        })
    }
}

/// One ranked applicant. Read-only for the lifetime of a results view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    /// 0 – 100
    pub score: f64,
    /// Years of experience.
    #[serde(default, alias = "years_of_experience")]
    pub experience: f64,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub skills_match: Option<f64>,
    #[serde(default)]
    pub experience_match: Option<f64>,
    #[serde(default)]
    pub education_match: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Candidate {
    /// True if the service reported any of the match breakdown percentages.
    pub fn has_sub_scores(&self) -> bool {
        self.skills_match.is_some()
            || self.experience_match.is_some()
            || self.education_match.is_some()
    }
}

/// Candidates for one completed job, in the order the service ranked them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub job_description: String,
    pub candidates: Vec<Candidate>,
}

impl ResultSet {
    pub fn find(&self, id: &str) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id.0 == id)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn candidate(id: &str, name: &str, score: f64, experience: f64) -> Candidate {
        Candidate {
            id: CandidateId(id.to_string()),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            phone: "555-0100".to_string(),
            score,
            experience,
            skills: vec!["Python".to_string(), "FastAPI".to_string()],
            summary: format!("{name} summary"),
            skills_match: None,
            experience_match: None,
            education_match: None,
            notes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_id_accepts_numbers_and_strings() {
        let json = r#"[{"id": 7, "name": "A", "score": 50}, {"id": "c-8", "name": "B", "score": 60}]"#;
        let parsed: Vec<Candidate> = serde_json::from_str(json).unwrap();
        assert_eq!(parsed[0].id.0, "7");
        assert_eq!(parsed[1].id.0, "c-8");
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"{"id": 1, "name": "Ada", "score": 92.5, "years_of_experience": 6}"#;
        let c: Candidate = serde_json::from_str(json).unwrap();
        assert_eq!(c.experience, 6.0);
        assert!(c.skills.is_empty());
        assert!(c.notes.is_none());
        assert!(!c.has_sub_scores());
    }

    #[test]
    fn test_sub_scores_detected() {
        let json = r#"{"id": 1, "name": "Ada", "score": 80, "skills_match": 90}"#;
        let c: Candidate = serde_json::from_str(json).unwrap();
        assert!(c.has_sub_scores());
    }

    #[test]
    fn test_result_set_without_description() {
        let json = r#"{"candidates": [{"id": 1, "name": "Ada", "score": 80}]}"#;
        let rs: ResultSet = serde_json::from_str(json).unwrap();
        assert_eq!(rs.job_description, "");
        assert!(rs.find("1").is_some());
        assert!(rs.find("2").is_none());
    }
}
