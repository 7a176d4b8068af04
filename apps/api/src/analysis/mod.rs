// Résumé text analysis: lexicon, language pipeline, segmentation and skills.

pub mod lexicon;
pub mod pipeline;
pub mod sections;
pub mod similarity;
pub mod skills;
pub mod stopwords;
