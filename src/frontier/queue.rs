use std::collections::VecDeque;

use crate::error::SearchError;

/// First-in first-out queue.
#[derive(Debug, Default)]
pub struct Fifo<T> {
    items: VecDeque<T>,
}

impl<T> Fifo<T> {
    pub fn new() -> Self {
        Fifo {
            items: VecDeque::new(),
        }
    }

    pub fn push(&mut self, item: T) {
        self.items.push_back(item);
    }

    pub fn pop(&mut self) -> Result<T, SearchError> {
        self.items.pop_front().ok_or(SearchError::EmptyQueue)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn drain(&mut self) -> Vec<T> {
        self.items.drain(..).collect()
    }
}

/// Last-in first-out stack.
#[derive(Debug, Default)]
pub struct Lifo<T> {
    items: Vec<T>,
}

impl<T> Lifo<T> {
    pub fn new() -> Self {
        Lifo { items: Vec::new() }
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn pop(&mut self) -> Result<T, SearchError> {
        self.items.pop().ok_or(SearchError::EmptyQueue)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn drain(&mut self) -> Vec<T> {
        self.items.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut q = Fifo::new();
        q.push(1);
        q.push(2);
        q.push(3);
        assert_eq!(q.len(), 3);
        assert_eq!(q.pop(), Ok(1));
        q.push(4);
        assert_eq!(q.pop(), Ok(2));
        assert_eq!(q.drain(), vec![3, 4]);
        assert_eq!(q.pop(), Err(SearchError::EmptyQueue));
    }

    #[test]
    fn test_lifo_order() {
        let mut s = Lifo::new();
        s.push('a');
        s.push('b');
        assert_eq!(s.pop(), Ok('b'));
        s.push('c');
        assert_eq!(s.pop(), Ok('c'));
        assert_eq!(s.pop(), Ok('a'));
        assert!(s.is_empty());
        assert_eq!(s.pop(), Err(SearchError::EmptyQueue));
    }
}
