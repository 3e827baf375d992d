pub mod assessment;
pub mod profile;

pub use assessment::{Answer, Assessment, AssessmentStatus, Question};
pub use profile::{BigFiveTrait, PersonalityProfile, TraitScore};
