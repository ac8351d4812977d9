pub mod privacy;
pub mod requester;
pub mod user;
pub mod visualization;

pub use privacy::Privacy;
pub use requester::Requester;
pub use user::User;
pub use visualization::Visualization;
