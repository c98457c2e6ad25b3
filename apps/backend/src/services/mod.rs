pub mod tutor;
