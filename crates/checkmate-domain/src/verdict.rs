//! Verdict module - the fixed display vocabulary for fact-check results

/// Canonical verdict of a fact check
///
/// Model answers use a free vocabulary ("True", "Misleading", "Uncertain",
/// "Partially True", ...). Every such token collapses onto one of these
/// four values:
/// - True: the claim holds
/// - False: the claim is wrong or misleading
/// - PartiallyTrue: parts of the claim hold
/// - Unclear: the evidence is insufficient, or the answer was not understood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// The claim holds
    True,

    /// The claim is wrong (misleading claims land here too)
    False,

    /// Only part of the claim holds
    PartiallyTrue,

    /// No usable answer
    Unclear,
}

impl Verdict {
    /// All canonical verdicts
    pub const ALL: [Verdict; 4] = [
        Verdict::True,
        Verdict::False,
        Verdict::PartiallyTrue,
        Verdict::Unclear,
    ];

    /// Get the verdict name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::True => "true",
            Verdict::False => "false",
            Verdict::PartiallyTrue => "partially-true",
            Verdict::Unclear => "unclear",
        }
    }

    /// Map a parsed model token onto the canonical vocabulary
    ///
    /// The mapping is total: anything unrecognized is `Unclear`.
    ///
    /// # Examples
    ///
    /// ```
    /// use checkmate_domain::Verdict;
    ///
    /// assert_eq!(Verdict::from_token("Misleading"), Verdict::False);
    /// assert_eq!(Verdict::from_token("partially true"), Verdict::PartiallyTrue);
    /// assert_eq!(Verdict::from_token("needs review"), Verdict::Unclear);
    /// ```
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_lowercase().as_str() {
            "true" => Verdict::True,
            "false" | "misleading" => Verdict::False,
            "partially true" | "partially-true" => Verdict::PartiallyTrue,
            "unclear" | "uncertain" => Verdict::Unclear,
            _ => Verdict::Unclear,
        }
    }

    /// Credibility score shown alongside the verdict (0-100)
    pub fn credibility_score(&self) -> u8 {
        match self {
            Verdict::True => 95,
            Verdict::False => 15,
            Verdict::PartiallyTrue => 65,
            Verdict::Unclear => 50,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
