pub mod answer_classifier;
pub mod bypass_router;
pub mod race_coordinator;
pub mod replies;
pub mod suffix_set;

pub use answer_classifier::AnswerClassifier;
pub use bypass_router::BypassRouter;
pub use race_coordinator::RaceCoordinator;
pub use suffix_set::SuffixSet;
