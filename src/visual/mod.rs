pub mod bucket;
pub mod color;
pub mod mapper;
pub mod track;
