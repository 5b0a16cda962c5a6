pub mod api;
pub mod classifier;
pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod gazetteer;
pub mod lemmatizer;
pub mod lexicon;
pub mod masking;
pub mod matcher;
pub mod normalization;
pub mod ranking;
pub mod store;
