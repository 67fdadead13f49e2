pub mod community;
pub mod goals;
pub mod plan;
pub mod profile;

pub use community::{AssessmentRecord, NewPost, Post, PostId, ProfileRecord, Session, User};
pub use goals::{ActivityLevel, Goals, Priority, PrioritySet};
pub use plan::{Macros, Plan, Recommendations};
pub use profile::{ConditionTags, Menopause, Profile, Sex};
