pub mod restrictions;
