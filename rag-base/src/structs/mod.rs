pub mod course_snippet;
pub mod rag_base_config;
