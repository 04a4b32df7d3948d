//! Tokens and sentences as read from a gold corpus

use std::fmt;

/// Sentinel relation label some corpora put on the root slot
pub const ROOT_SENTINEL: &str = "-root-";

/// Canonical relation label for the root
pub const ROOT_LABEL: &str = "root";

/// Form given to the implicit root token
pub const ROOT_FORM: &str = "<ROOT>";

/// Map the root sentinel onto the canonical root label.
///
/// Idempotent: labels other than [`ROOT_SENTINEL`] are returned unchanged.
pub fn normalize_deprel(label: &str) -> &str {
    if label == ROOT_SENTINEL {
        ROOT_LABEL
    } else {
        label
    }
}

/// A single token of a gold sentence
///
/// The relation label is canonicalized when the token is built and the
/// token is immutable afterwards, so downstream aggregation never needs to
/// touch labels again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    id: usize,
    form: String,
    deprel: String,
    head: usize,
}

impl Token {
    /// Create a token, normalizing its relation label
    pub fn new(id: usize, form: impl Into<String>, deprel: &str, head: usize) -> Self {
        Self {
            id,
            form: form.into(),
            deprel: normalize_deprel(deprel).to_string(),
            head,
        }
    }

    /// The implicit root token occupying slot 0 of every sentence
    pub fn root() -> Self {
        Self::new(0, ROOT_FORM, ROOT_SENTINEL, 0)
    }

    /// Position in the sentence (0 is the root)
    pub fn id(&self) -> usize {
        self.id
    }

    /// Surface form
    pub fn form(&self) -> &str {
        &self.form
    }

    /// Relation label
    pub fn deprel(&self) -> &str {
        &self.deprel
    }

    /// Gold head identifier
    pub fn head(&self) -> usize {
        self.head
    }

    /// Whether this token is the implicit root
    pub fn is_root(&self) -> bool {
        self.id == 0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.id, self.form, self.deprel)
    }
}

/// An ordered token sequence whose slot 0 holds the implicit root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    tokens: Vec<Token>,
}

impl Sentence {
    /// Build a sentence from tokens that already include the root slot
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Build a sentence from the non-root tokens, prepending the root
    pub fn with_root(words: impl IntoIterator<Item = Token>) -> Self {
        let mut tokens = vec![Token::root()];
        tokens.extend(words);
        Self { tokens }
    }

    /// All tokens including the root slot
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Token at a position, if any
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Number of tokens including the root slot
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the sentence holds no tokens at all
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
