pub mod sealer;
pub mod simulation;
