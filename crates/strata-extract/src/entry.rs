use crate::Result;

/// A named byte stream: an identifier (usually a path or URL) and its reader.
#[derive(Clone, Debug)]
pub struct StreamEntry<R> {
    pub id: String,
    pub stream: R,
}

impl<R> StreamEntry<R> {
    pub fn new(id: impl Into<String>, stream: R) -> Self {
        Self {
            id: id.into(),
            stream,
        }
    }

    pub fn into_parts(self) -> (String, R) {
        (self.id, self.stream)
    }
}

impl<R, S: Into<String>> From<(S, R)> for StreamEntry<R> {
    fn from((id, stream): (S, R)) -> Self {
        Self::new(id, stream)
    }
}

/// Forward-only provider of stream entries.
pub trait EntrySource {
    type Reader;

    fn next_entry(&mut self) -> Option<Result<StreamEntry<Self::Reader>>>;

    /// Number of entries this source yields in total, when it knows.
    fn entry_count(&self) -> Option<usize> {
        None
    }
}

impl<S: EntrySource + ?Sized> EntrySource for &mut S {
    type Reader = S::Reader;

    fn next_entry(&mut self) -> Option<Result<StreamEntry<Self::Reader>>> {
        (**self).next_entry()
    }

    fn entry_count(&self) -> Option<usize> {
        (**self).entry_count()
    }
}

/// Adapts an iterator of entries into an [`EntrySource`].
///
/// The count is taken from the iterator's size hint at construction, when
/// that hint is exact.
#[derive(Clone, Debug)]
pub struct IterSource<I> {
    iter: I,
    count: Option<usize>,
}

impl<I: Iterator> IterSource<I> {
    pub fn new<T>(iter: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        let iter = iter.into_iter();
        Self {
            count: exact_len(&iter),
            iter,
        }
    }
}

/// The iterator's length, if its size hint pins it down.
pub fn exact_len(iter: &impl Iterator) -> Option<usize> {
    match iter.size_hint() {
        (lower, Some(upper)) if lower == upper => Some(lower),
        _ => None,
    }
}

impl<I, R> EntrySource for IterSource<I>
where
    I: Iterator<Item = StreamEntry<R>>,
{
    type Reader = R;

    fn next_entry(&mut self) -> Option<Result<StreamEntry<R>>> {
        self.iter.next().map(Ok)
    }

    fn entry_count(&self) -> Option<usize> {
        self.count
    }
}
