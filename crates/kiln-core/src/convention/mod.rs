//! Built-in conventions.

mod discriminator;


pub use discriminator::DiscriminatorConvention;
