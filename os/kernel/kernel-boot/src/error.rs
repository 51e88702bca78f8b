use kernel_info::tags::TagListError;

/// A condition that ends the boot. There is nothing above this layer to
/// recover into, so every variant leads to a halt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Fatal {
    #[error("the boot loader passed no boot information")]
    MissingHandoff,
    #[error("mandatory boot tag missing: {tag}")]
    MissingMandatoryTag { tag: &'static str },
    #[error("malformed boot tag list: {0}")]
    MalformedTagList(#[from] TagListError),
    #[error("{module} initialization failed: {reason}")]
    ModuleInit {
        module: &'static str,
        reason: &'static str,
    },
}
