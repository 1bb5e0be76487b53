pub mod block;
pub mod brand;
pub mod case;
pub mod faq;
pub mod proposal;
pub mod publish;
pub mod user;
pub mod workspace;
