//! Growable ring buffer.
//!
//! Elements are pushed at the back and popped from the front.  When a push happens while the
//! buffer is full, the backing store is doubled (or allocated with `INITIAL_CAPACITY` slots if it
//! was empty) and the live elements are re-linearized starting at slot 0.
//!
//! `end` is never wrapped eagerly: it lives in `1..=capacity` while the buffer holds anything and
//! is only folded back to the start of the store right before the next write.  That keeps
//! `end == 0` as the one and only representation of an empty buffer.

use std::fmt::Debug;
use std::ops::{Index, IndexMut};

use thiserror::Error;

const INITIAL_CAPACITY: usize = 4;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RingBufferError {
  #[error("index {index} is out of bounds of the RingBuffer with len {len}")]
  IndexOutOfRange { index: usize, len: usize },
  #[error("the RingBuffer is empty")]
  Empty,
}

pub struct RingBuffer<T> {
  buf: Vec<Option<T>>,
  begin: usize,
  end: usize,
}

impl<T> RingBuffer<T> {
  pub fn new(capacity: usize) -> Self {
    let mut buf = Vec::with_capacity(capacity);
    buf.resize_with(capacity, || None);
    RingBuffer {
      buf,
      begin: 0,
      end: 0,
    }
  }

  #[inline]
  pub fn capacity(&self) -> usize {
    self.buf.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.end == 0
  }

  pub fn len(&self) -> usize {
    if self.end == 0 {
      return 0;
    }
    if self.begin < self.end {
      return self.end - self.begin;
    }
    self.buf.len() - self.begin + self.end
  }

  #[inline]
  fn physical_ix(&self, index: usize) -> Result<usize, RingBufferError> {
    let len = self.len();
    if index >= len {
      return Err(RingBufferError::IndexOutOfRange { index, len });
    }
    Ok((self.begin + index) % self.buf.len())
  }

  pub fn get(&self, index: usize) -> Result<&T, RingBufferError> {
    let ix = self.physical_ix(index)?;
    self.buf[ix]
      .as_ref()
      .ok_or(RingBufferError::IndexOutOfRange {
        index,
        len: self.len(),
      })
  }

  pub fn get_mut(&mut self, index: usize) -> Result<&mut T, RingBufferError> {
    let ix = self.physical_ix(index)?;
    let len = self.len();
    self.buf[ix]
      .as_mut()
      .ok_or(RingBufferError::IndexOutOfRange { index, len })
  }

  pub fn set(&mut self, index: usize, value: T) -> Result<(), RingBufferError> {
    let ix = self.physical_ix(index)?;
    self.buf[ix] = Some(value);
    Ok(())
  }

  /// Oldest element
  pub fn front(&self) -> Option<&T> {
    self.get(0).ok()
  }

  /// Newest element
  pub fn back(&self) -> Option<&T> {
    let len = self.len();
    if len == 0 {
      return None;
    }
    self.get(len - 1).ok()
  }

  pub fn push_back(&mut self, item: T) {
    if self.len() == self.capacity() {
      self.grow();
    }

    self.end %= self.buf.len();
    self.buf[self.end] = Some(item);
    self.end += 1;
  }

  pub fn pop_front(&mut self) -> Result<T, RingBufferError> {
    if self.is_empty() {
      return Err(RingBufferError::Empty);
    }

    let item = self.buf[self.begin].take();
    self.begin += 1;

    if self.begin == self.end {
      // empty now; reset so that the offsets don't drift around the store
      self.begin = 0;
      self.end = 0;
    } else {
      self.begin %= self.buf.len();
    }

    item.ok_or(RingBufferError::Empty)
  }

  /// Drops all live elements.  The backing store is kept around for reuse.
  pub fn clear(&mut self) {
    for slot in &mut self.buf {
      *slot = None;
    }
    self.begin = 0;
    self.end = 0;
  }

  /// Iterates from the oldest element to the newest.
  pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
    let cap = self.buf.len();
    (0..self.len()).filter_map(move |i| self.buf[(self.begin + i) % cap].as_ref())
  }

  fn grow(&mut self) {
    let len = self.buf.len();
    if len == 0 {
      self.buf.resize_with(INITIAL_CAPACITY, || None);
      self.begin = 0;
      self.end = 0;
      return;
    }

    // only called when full, so every slot is live
    let mut target: Vec<Option<T>> = Vec::with_capacity(len * 2);
    target.extend(self.buf[self.begin..].iter_mut().map(Option::take));
    target.extend(self.buf[..self.begin].iter_mut().map(Option::take));
    target.resize_with(len * 2, || None);

    self.buf = target;
    self.begin = 0;
    self.end = len;
  }
}

impl<T: Clone> RingBuffer<T> {
  pub fn repeat(count: usize, item: T) -> Self {
    RingBuffer {
      buf: vec![Some(item); count],
      begin: 0,
      end: count,
    }
  }
}

impl<T> Default for RingBuffer<T> {
  fn default() -> Self {
    RingBuffer::new(0)
  }
}

impl<T: Debug> Debug for RingBuffer<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_list().entries(self.iter()).finish()
  }
}

impl<T> Index<usize> for RingBuffer<T> {
  type Output = T;

  fn index(&self, index: usize) -> &T {
    match self.get(index) {
      Ok(item) => item,
      Err(err) => panic!("{err}"),
    }
  }
}

impl<T> IndexMut<usize> for RingBuffer<T> {
  fn index_mut(&mut self, index: usize) -> &mut T {
    match self.get_mut(index) {
      Ok(item) => item,
      Err(err) => panic!("{err}"),
    }
  }
}

impl<T> Extend<T> for RingBuffer<T> {
  fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
    for item in iter {
      self.push_back(item);
    }
  }
}

impl<T> FromIterator<T> for RingBuffer<T> {
  fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
    let mut buffer = RingBuffer::new(0);
    buffer.extend(iter);
    buffer
  }
}
