//! Regenerated exam papers

/// How the regenerated paper should compare to the uploaded one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PaperDifficulty {
    /// Gentler questions covering the same material
    Easier,

    /// Same level as the original
    #[default]
    Same,

    /// More demanding questions
    Harder,
}

impl PaperDifficulty {
    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            PaperDifficulty::Easier => "easier",
            PaperDifficulty::Same => "same",
            PaperDifficulty::Harder => "harder",
        }
    }

    /// Parse a difficulty from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easier" => Some(PaperDifficulty::Easier),
            "same" => Some(PaperDifficulty::Same),
            "harder" => Some(PaperDifficulty::Harder),
            _ => None,
        }
    }
}

impl std::str::FromStr for PaperDifficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid paper difficulty: {}", s))
    }
}

/// One question on a regenerated paper
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamQuestion {
    /// Position on the paper, starting at "1"
    pub number: String,

    /// Question text
    pub text: String,

    /// Marks available, if the model gave a usable value
    pub marks: Option<u32>,
}

/// A regenerated exam paper. Never holds zero questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamPaper {
    /// Paper title, if the model supplied one
    pub title: Option<String>,

    /// Questions in paper order
    pub questions: Vec<ExamQuestion>,
}

impl ExamPaper {
    /// Sum of all known marks
    pub fn total_marks(&self) -> u32 {
        self.questions.iter().filter_map(|q| q.marks).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_parse() {
        assert_eq!(PaperDifficulty::parse("Harder"), Some(PaperDifficulty::Harder));
        assert_eq!("same".parse::<PaperDifficulty>(), Ok(PaperDifficulty::Same));
        assert!("medium".parse::<PaperDifficulty>().is_err());
        assert_eq!(PaperDifficulty::default(), PaperDifficulty::Same);
    }

    #[test]
    fn test_total_marks_skips_unknown() {
        let paper = ExamPaper {
            title: Some("SL questions".to_string()),
            questions: vec![
                ExamQuestion { number: "1".into(), text: "Define motivation.".into(), marks: Some(2) },
                ExamQuestion { number: "2".into(), text: "Explain Herzberg.".into(), marks: None },
                ExamQuestion { number: "3".into(), text: "Discuss Likert.".into(), marks: Some(6) },
            ],
        };
        assert_eq!(paper.total_marks(), 8);
    }
}
