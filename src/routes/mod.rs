pub(crate) mod companies;
pub(crate) mod health;
pub(crate) mod quarters;
