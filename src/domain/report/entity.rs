//! Career assessment report

use serde::{Deserialize, Serialize};

/// Salary band for a career match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: f64,
    pub max: f64,
}

/// A concrete job title suggested by the analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerMatch {
    pub title: String,
    pub company_type: String,
    /// 0-100
    pub match_score: f64,
    pub salary_range: SalaryRange,
    /// 0-100
    pub growth_potential: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CareerPaths {
    #[serde(default)]
    pub careers: Vec<CareerMatch>,
}

/// Final report produced from an assessment
///
/// Field names on the wire are the section titles shown to the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentReport {
    #[serde(rename = "Core Strengths", default)]
    pub core_strengths: Vec<String>,
    #[serde(rename = "Primary Career Paths", default)]
    pub primary_career_paths: CareerPaths,
    #[serde(rename = "Work Environment", default)]
    pub work_environment: Vec<String>,
    #[serde(rename = "Development Plan", default)]
    pub development_plan: Vec<String>,
    #[serde(rename = "Action Items", default)]
    pub action_items: Vec<String>,
}

impl AssessmentReport {
    /// Career matches ordered by descending match score
    pub fn ranked_careers(&self) -> Vec<&CareerMatch> {
        let mut careers: Vec<&CareerMatch> = self.primary_career_paths.careers.iter().collect();
        careers.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
        careers
    }
}
