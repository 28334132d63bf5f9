//! Macros for ergonomic page definitions.

/// Declare an enum of page definitions and implement `PageDefinition`
/// with each variant's name as its kind.
///
/// Variants may be unit, tuple or struct variants. Field types must be
/// serde-serializable, comparable and debuggable.
///
/// # Example
///
/// ```
/// use pageflow::core::PageDefinition;
/// use pageflow::page_enum;
///
/// page_enum! {
///     pub enum MailPage {
///         Inbox,
///         Thread(u64),
///         Compose { reply_to: Option<u64> },
///     }
/// }
///
/// assert_eq!(MailPage::Inbox.kind(), "Inbox");
/// assert_eq!(MailPage::Thread(3).kind(), "Thread");
/// assert_eq!(MailPage::Compose { reply_to: None }.kind(), "Compose");
/// ```
#[macro_export]
macro_rules! page_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
                $( ( $($tuple:ty),* $(,)? ) )?
                $( { $($field:ident : $field_ty:ty),* $(,)? } )?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
                $( ( $($tuple),* ) )?
                $( { $($field : $field_ty),* } )?
            ),*
        }

        impl $crate::core::PageDefinition for $name {
            fn kind(&self) -> &str {
                match self {
                    $(Self::$variant { .. } => stringify!($variant)),*
                }
            }
        }
    };
}
