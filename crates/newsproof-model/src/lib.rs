//! Pre-trained reliability model for newsproof.
//!
//! A fitted TF-IDF vectorizer and a logistic regression classifier are
//! exported from training as two JSON artifacts and evaluated here in pure
//! Rust. [`ModelHandle`] wraps them as a lazily loaded
//! [`Classifier`](newsproof_core::classify::Classifier).
//!
//! # Artifact format
//!
//! Both files live in one directory and are plain JSON exported from the
//! fitted scikit-learn objects.
//!
//! `vectorizer.json`, from a `TfidfVectorizer`:
//!
//! | Field          | Source                                  | Default |
//! |----------------|-----------------------------------------|---------|
//! | `vocabulary`   | `vocabulary_`, term → column (as `int`) | required |
//! | `idf`          | `idf_.tolist()`                         | required |
//! | `lowercase`    | the `lowercase` parameter               | `true`  |
//! | `sublinear_tf` | the `sublinear_tf` parameter            | `false` |
//! | `norm`         | the `norm` parameter, `"l2"` or `"none"` | `"l2"` |
//! | `stop_words`   | `sorted(get_stop_words() or [])`        | `[]`    |
//!
//! `model.json`, from a binary `LogisticRegression`:
//!
//! | Field        | Source                          | Default  |
//! |--------------|---------------------------------|----------|
//! | `coef`       | `coef_[0].tolist()`             | required |
//! | `intercept`  | `float(intercept_[0])`          | required |
//! | `classes`    | `classes_.tolist()`             | `[0, 1]` |
//! | `fake_label` | label used for fake in training | `1`      |
//!
//! `coef_[0]` scores `classes_[1]`, so the fake probability is the sigmoid of
//! the decision function when `classes[1] == fake_label` and its complement
//! otherwise. The vectorizer's `token_pattern` must be the default
//! `(?u)\b\w\w+\b`, and `smooth_idf` needs no field since `idf_` already
//! includes it. A minimal export:
//!
//! ```python
//! json.dump({"vocabulary": {t: int(i) for t, i in vec.vocabulary_.items()},
//!            "idf": vec.idf_.tolist(), "sublinear_tf": vec.sublinear_tf,
//!            "norm": vec.norm or "none"}, open("vectorizer.json", "w"))
//! json.dump({"coef": clf.coef_[0].tolist(),
//!            "intercept": float(clf.intercept_[0]),
//!            "classes": clf.classes_.tolist()}, open("model.json", "w"))
//! ```

pub mod classifier;
pub mod error;
pub mod handle;
pub mod model;
pub mod vectorizer;

pub use error::{Error, Result};
pub use handle::ModelHandle;
pub use model::ReliabilityModel;
