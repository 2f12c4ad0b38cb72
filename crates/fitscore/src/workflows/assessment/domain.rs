use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Single answer on the 1..5 scale. `0` marks a dimension that has not been answered yet.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const UNANSWERED: Rating = Rating(0);
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX)
            .contains(&value)
            .then_some(Self(value))
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    pub const fn is_answered(self) -> bool {
        self.0 > 0
    }

    /// Coerce raw radio input into a rating, rejecting anything outside 1..5.
    pub fn coerce(input: &RatingInput) -> Result<Self, RatingError> {
        let parsed = match input {
            RatingInput::Number(value) => Some(*value),
            RatingInput::Text(raw) => raw.trim().parse::<i64>().ok(),
        };

        parsed
            .and_then(|value| u8::try_from(value).ok())
            .and_then(Self::new)
            .ok_or_else(|| RatingError::OutOfRange(input.to_string()))
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingError;

    /// Accepts `0` as unanswered, otherwise the 1..5 scale.
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value == Self::UNANSWERED.0 {
            return Ok(Self::UNANSWERED);
        }
        Self::new(value).ok_or_else(|| RatingError::OutOfRange(value.to_string()))
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw value as received from a radio group: either a number or its string form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RatingInput {
    Number(i64),
    Text(String),
}

impl From<u8> for RatingInput {
    fn from(value: u8) -> Self {
        Self::Number(i64::from(value))
    }
}

impl From<&str> for RatingInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl fmt::Display for RatingInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatingInput::Number(value) => write!(f, "{value}"),
            RatingInput::Text(raw) => write!(f, "'{raw}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RatingError {
    #[error("rating must be an integer between 1 and 5, got {0}")]
    OutOfRange(String),
}

/// Answer blocks scored by the engine, in the order they are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Performance,
    Energy,
    Culture,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Performance, Category::Energy, Category::Culture];

    pub const fn step(self) -> AssessmentStep {
        match self {
            Category::Performance => AssessmentStep::Performance,
            Category::Energy => AssessmentStep::Energy,
            Category::Culture => AssessmentStep::Culture,
        }
    }

    pub const fn heading(self) -> &'static str {
        match self {
            Category::Performance => "Performance - Experiência e Entregas",
            Category::Energy => "Energia - Disponibilidade e Ritmo",
            Category::Culture => "Cultura - Valores da LEGAL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceDimension {
    Experience,
    Deliveries,
    Skills,
    Quality,
}

impl PerformanceDimension {
    pub const ALL: [Self; 4] = [
        Self::Experience,
        Self::Deliveries,
        Self::Skills,
        Self::Quality,
    ];

    pub const fn prompt(self) -> &'static str {
        match self {
            Self::Experience => "Nível de experiência na área",
            Self::Deliveries => "Qualidade das entregas anteriores",
            Self::Skills => "Domínio técnico das habilidades",
            Self::Quality => "Atenção aos detalhes e qualidade",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyDimension {
    Availability,
    Deadlines,
    Pressure,
}

impl EnergyDimension {
    pub const ALL: [Self; 3] = [Self::Availability, Self::Deadlines, Self::Pressure];

    pub const fn prompt(self) -> &'static str {
        match self {
            Self::Availability => "Disponibilidade para o trabalho",
            Self::Deadlines => "Capacidade de cumprir prazos",
            Self::Pressure => "Performance sob pressão",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CultureDimension {
    Transparency,
    Collaboration,
    Innovation,
}

impl CultureDimension {
    pub const ALL: [Self; 3] = [Self::Transparency, Self::Collaboration, Self::Innovation];

    pub const fn prompt(self) -> &'static str {
        match self {
            Self::Transparency => "Alinhamento com transparência",
            Self::Collaboration => "Colaboração em equipe",
            Self::Innovation => "Inovação e aprendizado contínuo",
        }
    }
}

/// A rated dimension tagged with the block it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "category", content = "dimension", rename_all = "snake_case")]
pub enum Dimension {
    Performance(PerformanceDimension),
    Energy(EnergyDimension),
    Culture(CultureDimension),
}

impl Dimension {
    pub const fn category(self) -> Category {
        match self {
            Dimension::Performance(_) => Category::Performance,
            Dimension::Energy(_) => Category::Energy,
            Dimension::Culture(_) => Category::Culture,
        }
    }

    pub const fn prompt(self) -> &'static str {
        match self {
            Dimension::Performance(dimension) => dimension.prompt(),
            Dimension::Energy(dimension) => dimension.prompt(),
            Dimension::Culture(dimension) => dimension.prompt(),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Performance(dimension) => write!(f, "performance.{dimension:?}"),
            Dimension::Energy(dimension) => write!(f, "energy.{dimension:?}"),
            Dimension::Culture(dimension) => write!(f, "culture.{dimension:?}"),
        }
    }
}

/// Shared view over the three answer blocks.
pub trait AnswerBlock {
    fn category(&self) -> Category;

    fn ratings(&self) -> Vec<(Dimension, Rating)>;

    fn is_complete(&self) -> bool {
        self.ratings().iter().all(|(_, rating)| rating.is_answered())
    }

    fn unanswered(&self) -> Vec<Dimension> {
        self.ratings()
            .into_iter()
            .filter(|(_, rating)| !rating.is_answered())
            .map(|(dimension, _)| dimension)
            .collect()
    }
}

/// Wire keys follow the stored answer format consumed by the notification workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PerformanceAnswers {
    #[serde(rename = "experiencia")]
    pub experience: Rating,
    #[serde(rename = "entregas")]
    pub deliveries: Rating,
    #[serde(rename = "habilidades")]
    pub skills: Rating,
    #[serde(rename = "qualidade")]
    pub quality: Rating,
}

impl PerformanceAnswers {
    pub fn get(&self, dimension: PerformanceDimension) -> Rating {
        match dimension {
            PerformanceDimension::Experience => self.experience,
            PerformanceDimension::Deliveries => self.deliveries,
            PerformanceDimension::Skills => self.skills,
            PerformanceDimension::Quality => self.quality,
        }
    }

    pub fn set(&mut self, dimension: PerformanceDimension, rating: Rating) {
        let slot = match dimension {
            PerformanceDimension::Experience => &mut self.experience,
            PerformanceDimension::Deliveries => &mut self.deliveries,
            PerformanceDimension::Skills => &mut self.skills,
            PerformanceDimension::Quality => &mut self.quality,
        };
        *slot = rating;
    }
}

impl AnswerBlock for PerformanceAnswers {
    fn category(&self) -> Category {
        Category::Performance
    }

    fn ratings(&self) -> Vec<(Dimension, Rating)> {
        PerformanceDimension::ALL
            .iter()
            .map(|dimension| (Dimension::Performance(*dimension), self.get(*dimension)))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnergyAnswers {
    #[serde(rename = "disponibilidade")]
    pub availability: Rating,
    #[serde(rename = "prazos")]
    pub deadlines: Rating,
    #[serde(rename = "pressão")]
    pub pressure: Rating,
}

impl EnergyAnswers {
    pub fn get(&self, dimension: EnergyDimension) -> Rating {
        match dimension {
            EnergyDimension::Availability => self.availability,
            EnergyDimension::Deadlines => self.deadlines,
            EnergyDimension::Pressure => self.pressure,
        }
    }

    pub fn set(&mut self, dimension: EnergyDimension, rating: Rating) {
        let slot = match dimension {
            EnergyDimension::Availability => &mut self.availability,
            EnergyDimension::Deadlines => &mut self.deadlines,
            EnergyDimension::Pressure => &mut self.pressure,
        };
        *slot = rating;
    }
}

impl AnswerBlock for EnergyAnswers {
    fn category(&self) -> Category {
        Category::Energy
    }

    fn ratings(&self) -> Vec<(Dimension, Rating)> {
        EnergyDimension::ALL
            .iter()
            .map(|dimension| (Dimension::Energy(*dimension), self.get(*dimension)))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CultureAnswers {
    #[serde(rename = "valores1")]
    pub transparency: Rating,
    #[serde(rename = "valores2")]
    pub collaboration: Rating,
    #[serde(rename = "valores3")]
    pub innovation: Rating,
}

impl CultureAnswers {
    pub fn get(&self, dimension: CultureDimension) -> Rating {
        match dimension {
            CultureDimension::Transparency => self.transparency,
            CultureDimension::Collaboration => self.collaboration,
            CultureDimension::Innovation => self.innovation,
        }
    }

    pub fn set(&mut self, dimension: CultureDimension, rating: Rating) {
        let slot = match dimension {
            CultureDimension::Transparency => &mut self.transparency,
            CultureDimension::Collaboration => &mut self.collaboration,
            CultureDimension::Innovation => &mut self.innovation,
        };
        *slot = rating;
    }
}

impl AnswerBlock for CultureAnswers {
    fn category(&self) -> Category {
        Category::Culture
    }

    fn ratings(&self) -> Vec<(Dimension, Rating)> {
        CultureDimension::ALL
            .iter()
            .map(|dimension| (Dimension::Culture(*dimension), self.get(*dimension)))
            .collect()
    }
}

/// The three rated blocks, stored alongside the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssessmentAnswers {
    pub performance: PerformanceAnswers,
    #[serde(rename = "energia")]
    pub energy: EnergyAnswers,
    #[serde(rename = "cultura")]
    pub culture: CultureAnswers,
}

impl AssessmentAnswers {
    pub fn rating(&self, dimension: Dimension) -> Rating {
        match dimension {
            Dimension::Performance(dimension) => self.performance.get(dimension),
            Dimension::Energy(dimension) => self.energy.get(dimension),
            Dimension::Culture(dimension) => self.culture.get(dimension),
        }
    }

    pub fn set(&mut self, dimension: Dimension, rating: Rating) {
        match dimension {
            Dimension::Performance(dimension) => self.performance.set(dimension, rating),
            Dimension::Energy(dimension) => self.energy.set(dimension, rating),
            Dimension::Culture(dimension) => self.culture.set(dimension, rating),
        }
    }

    pub fn block(&self, category: Category) -> &dyn AnswerBlock {
        match category {
            Category::Performance => &self.performance,
            Category::Energy => &self.energy,
            Category::Culture => &self.culture,
        }
    }
}

/// Identity of the candidate being assessed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CandidateInfo {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateField {
    Name,
    Email,
}

/// Any field an evaluator can interact with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    Candidate(CandidateField),
    Rating(Dimension),
}

impl From<CandidateField> for FieldKey {
    fn from(value: CandidateField) -> Self {
        Self::Candidate(value)
    }
}

impl From<Dimension> for FieldKey {
    fn from(value: Dimension) -> Self {
        Self::Rating(value)
    }
}

/// Fields the evaluator has interacted with. Only drives hint display.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TouchedFields(BTreeSet<FieldKey>);

impl TouchedFields {
    pub fn mark(&mut self, field: impl Into<FieldKey>) {
        self.0.insert(field.into());
    }

    pub fn contains(&self, field: impl Into<FieldKey>) -> bool {
        self.0.contains(&field.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Sections of the assessment, strictly linear.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStep {
    #[default]
    CandidateInfo,
    Performance,
    Energy,
    Culture,
}

impl AssessmentStep {
    pub const ALL: [AssessmentStep; 4] = [
        AssessmentStep::CandidateInfo,
        AssessmentStep::Performance,
        AssessmentStep::Energy,
        AssessmentStep::Culture,
    ];
    pub const FIRST: AssessmentStep = AssessmentStep::CandidateInfo;
    pub const LAST: AssessmentStep = AssessmentStep::Culture;

    pub const fn index(self) -> usize {
        match self {
            AssessmentStep::CandidateInfo => 0,
            AssessmentStep::Performance => 1,
            AssessmentStep::Energy => 2,
            AssessmentStep::Culture => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub const fn title(self) -> &'static str {
        match self {
            AssessmentStep::CandidateInfo => "Dados do Candidato",
            AssessmentStep::Performance => "Performance",
            AssessmentStep::Energy => "Energia",
            AssessmentStep::Culture => "Cultura",
        }
    }

    pub const fn category(self) -> Option<Category> {
        match self {
            AssessmentStep::CandidateInfo => None,
            AssessmentStep::Performance => Some(Category::Performance),
            AssessmentStep::Energy => Some(Category::Energy),
            AssessmentStep::Culture => Some(Category::Culture),
        }
    }

    /// Fraction of the form already behind the evaluator, `0.0` on the first step.
    pub fn progress(self) -> f32 {
        self.index() as f32 / Self::LAST.index() as f32
    }
}

/// Everything the evaluator has entered so far.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssessmentDraft {
    pub candidate: CandidateInfo,
    pub answers: AssessmentAnswers,
    pub active_step: AssessmentStep,
    #[serde(default)]
    pub touched: TouchedFields,
}
