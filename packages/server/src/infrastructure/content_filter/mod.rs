//! ContentFilter 実装

pub mod word_list;

pub use word_list::WordListFilter;
