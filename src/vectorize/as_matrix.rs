//! Stack vectorizable entities into the rows of a matrix.

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::progress::{LogProgress, Progress, bytes_str, progress_bar_str};

use super::Vectorizable;

/// A matrix built from entities, plus the template when it was requested.
#[derive(Debug)]
pub struct Stacked<T, B> {
    /// `(length, n_parameters)`, one entity per row.
    pub matrix: Matrix<T>,
    /// The first entity, kept for mapping rows back with `from_matrix`.
    pub template: Option<B>,
    /// Rows actually written. Less than `matrix.rows()` when a lazy source
    /// ran dry before the declared length; the remaining rows are zero.
    pub filled: usize,
}

impl<T, B> Stacked<T, B> {
    pub fn into_parts(self) -> (Matrix<T>, Option<B>) {
        (self.matrix, self.template)
    }
}

/// Options for [`as_matrix`] and [`as_matrix_iter`].
#[derive(Default)]
pub struct StackOptions<'p> {
    return_template: bool,
    progress: Option<Box<dyn Progress + 'p>>,
}

impl<'p> StackOptions<'p> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the template entity in [`Stacked::template`].
    pub fn return_template(mut self, yes: bool) -> Self {
        self.return_template = yes;
        self
    }

    /// Send an update to `sink` after every row past the first.
    pub fn progress(mut self, sink: impl Progress + 'p) -> Self {
        self.progress = Some(Box::new(sink));
        self
    }

    /// Report progress through `tracing` (see [`LogProgress`]).
    pub fn verbose(self) -> Self {
        self.progress(LogProgress)
    }
}

/// Build a matrix from a slice of entities.
///
/// The first entity is the template: it fixes `n_parameters` and is returned
/// by reference when requested.
///
/// # Errors
///
/// `EmptySource` for an empty slice, `VectorLength` if an entity's encoding
/// does not have the template's length.
///
/// # Example
///
/// ```
/// use blockmat::vectorize::{StackOptions, as_matrix};
///
/// let samples = vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]];
/// let stacked = as_matrix(&samples, StackOptions::new().return_template(true)).unwrap();
///
/// assert_eq!(stacked.matrix.shape(), (3, 2));
/// assert_eq!(stacked.matrix.row(2), &[5.0, 6.0]);
/// assert_eq!(stacked.template, Some(&samples[0]));
/// ```
pub fn as_matrix<'e, V: Vectorizable>(
    entities: &'e [V],
    mut options: StackOptions<'_>,
) -> Result<Stacked<V::Scalar, &'e V>> {
    let Some((template, rest)) = entities.split_first() else {
        return Err(Error::EmptySource);
    };
    let length = entities.len();
    let (matrix, filled) = fill_rows(
        template,
        rest.iter().map(V::as_vector),
        length,
        options.progress.as_deref_mut(),
    )?;

    Ok(Stacked {
        matrix,
        template: options.return_template.then_some(template),
        filled,
    })
}

/// Build a matrix from a lazy source of known length.
///
/// Exactly `length` rows are allocated. Items past `length` are never pulled
/// from the iterator. If it yields fewer than `length` items the trailing
/// rows are left at zero and a warning is logged; this is not an error, check
/// [`Stacked::filled`] to detect it.
///
/// # Errors
///
/// `EmptySource` if `length == 0` or the source yields nothing,
/// `VectorLength` if an entity's encoding does not have the template's length,
/// `ShapeMismatch` if `length × n_parameters` does not fit in `usize`.
pub fn as_matrix_iter<I>(
    entities: I,
    length: usize,
    mut options: StackOptions<'_>,
) -> Result<Stacked<<I::Item as Vectorizable>::Scalar, I::Item>>
where
    I: IntoIterator,
    I::Item: Vectorizable,
{
    if length == 0 {
        return Err(Error::EmptySource);
    }
    let mut entities = entities.into_iter();
    let template = entities.next().ok_or(Error::EmptySource)?;
    let (matrix, filled) = fill_rows(
        &template,
        entities.map(|entity| entity.as_vector()),
        length,
        options.progress.as_deref_mut(),
    )?;

    Ok(Stacked {
        matrix,
        template: options.return_template.then_some(template),
        filled,
    })
}

/// Shared core: template in row 0, then up to `length - 1` more encodings.
fn fill_rows<'p, V: Vectorizable>(
    template: &V,
    rest: impl Iterator<Item = Vec<V::Scalar>>,
    length: usize,
    mut progress: Option<&mut (dyn Progress + 'p)>,
) -> Result<(Matrix<V::Scalar>, usize)> {
    let n_parameters = template.n_parameters();
    let first = template.as_vector();
    check_length(0, n_parameters, first.len())?;

    let mut matrix = Matrix::try_zeros(length, n_parameters)?;
    info!(
        rows = length,
        cols = n_parameters,
        "allocated data matrix {}",
        bytes_str(matrix.nbytes())
    );
    matrix.row_mut(0).copy_from_slice(&first);

    let mut filled = 1;
    for (i, vector) in (1..length).zip(rest) {
        check_length(i, n_parameters, vector.len())?;
        matrix.row_mut(i).copy_from_slice(&vector);
        filled += 1;

        if let Some(sink) = progress.as_mut() {
            let fraction = (i + 1) as f64 / length as f64;
            let label = format!(
                "Building data matrix from {} samples - {}",
                length,
                progress_bar_str(fraction, 20, true)
            );
            sink.update(fraction, &label);
        }
    }

    if filled < length {
        warn!(
            declared = length,
            produced = filled,
            "source ended early; trailing rows left at zero"
        );
    } else {
        debug!(rows = filled, "data matrix complete");
    }

    Ok((matrix, filled))
}

fn check_length(row: usize, expected: usize, found: usize) -> Result<()> {
    if found != expected {
        return Err(Error::VectorLength {
            row,
            expected,
            found,
        });
    }
    Ok(())
}
