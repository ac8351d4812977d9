pub mod requester;

pub use requester::SESSION_COOKIE;
