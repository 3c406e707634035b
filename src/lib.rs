/*! StrepHit text-mining toolkit.

Extracts sentences holding lexical units from biographical corpora ([extraction]),
ranks the verbs of a corpus ([ranking]) and links entities through the Dandelion API ([linking]).
Each tool is exposed as a [pipelines::Pipeline].
!*/
pub mod error;
pub mod extraction;
pub mod io;
pub mod lang;
pub mod linking;
pub mod nlp;
pub mod parallel;
pub mod pipelines;
pub mod ranking;
