pub mod plp_link;
pub mod shrt;
pub mod user;

pub use plp_link::Entity as PlpLinkEntity;
pub use shrt::Entity as ShrtEntity;
pub use user::Entity as UserEntity;
