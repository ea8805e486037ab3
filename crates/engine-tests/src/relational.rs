//! Behaviour specific to the relational backend: part-of-speech aware mode,
//! derived columns, word lists and shared handles.
