pub mod extractor;
pub mod skeleton;
pub mod source;
pub mod walker;

pub use extractor::{
    Declaration, DeclarationKind, JavaExtractor, LineRange, Member, MemberKind, ParsedFile,
    SyntaxTree,
};
pub use skeleton::render_skeleton;
pub use walker::{Exclusions, Walker};
