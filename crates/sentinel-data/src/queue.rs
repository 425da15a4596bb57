// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Priority-ordered queue of pending tasks.

use sentinel_core::task::{Priority, Task, TaskId};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A queue of pending tasks, ordered by non-increasing priority.
///
/// Among tasks of equal priority, arrival order is kept: a new task goes behind
/// every queued task of the same priority. Both operations take the lock only
/// for the insert/remove itself and never wait for work to appear.
#[derive(Debug, Default)]
pub struct TaskQueue {
    tasks: Mutex<VecDeque<Task>>,
}

impl TaskQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Task>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts a task at its priority position.
    pub fn push(&self, task: Task) {
        let mut tasks = self.lock();
        let index = insertion_index(&tasks, task.priority());
        log::trace!(
            "TaskQueue: {} ({}) inserted at {}",
            task.id(),
            task.priority(),
            index
        );
        tasks.insert(index, task);
    }

    /// Removes and returns the head of the queue, if any.
    ///
    /// Ownership of the task moves to the caller.
    pub fn take_next(&self) -> Option<Task> {
        self.lock().pop_front()
    }

    /// Removes a pending task by id.
    pub fn cancel(&self, id: TaskId) -> Option<Task> {
        let mut tasks = self.lock();
        let index = tasks.iter().position(|t| t.id() == id)?;
        tasks.remove(index)
    }

    /// Returns the zero-based position of a pending task.
    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.lock().iter().position(|t| t.id() == id)
    }

    /// Returns the ids of all pending tasks, head first.
    pub fn pending_ids(&self) -> Vec<TaskId> {
        self.lock().iter().map(Task::id).collect()
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Finds where a task of `priority` goes.
///
/// An empty queue, or a priority strictly above the head, inserts at the head.
/// Otherwise the scan walks forward while the next task's priority is at least
/// `priority` and inserts right after the last such task.
fn insertion_index(tasks: &VecDeque<Task>, priority: Priority) -> usize {
    match tasks.front() {
        None => 0,
        Some(head) if priority > head.priority() => 0,
        Some(_) => {
            let mut current = 0;
            while current + 1 < tasks.len() && tasks[current + 1].priority() >= priority {
                current += 1;
            }
            current + 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_core::mode::Mode;
    use sentinel_core::task::{Handler, TaskType};
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    fn task(id: u64, priority: Priority) -> Task {
        Task::new(
            TaskId::new(id).unwrap(),
            TaskType::Analysis,
            priority,
            Mode::Development,
            Vec::new(),
            Handler::Noop,
        )
    }

    fn drain(queue: &TaskQueue) -> Vec<(u64, Priority)> {
        std::iter::from_fn(|| queue.take_next())
            .map(|t| (t.id().as_raw(), t.priority()))
            .collect()
    }

    #[test]
    fn test_empty_queue_reports_none() {
        let queue = TaskQueue::new();
        assert!(queue.is_empty());
        assert!(queue.take_next().is_none());
    }

    #[test]
    fn test_higher_priority_goes_first() {
        let queue = TaskQueue::new();
        queue.push(task(1, Priority::Low));
        queue.push(task(2, Priority::Critical));
        queue.push(task(3, Priority::Normal));
        queue.push(task(4, Priority::Realtime));

        let order: Vec<u64> = drain(&queue).into_iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec![4, 2, 3, 1]);
    }

    #[test]
    fn test_equal_priorities_are_fifo() {
        let queue = TaskQueue::new();
        queue.push(task(1, Priority::High));
        queue.push(task(2, Priority::Normal));
        queue.push(task(3, Priority::High));
        queue.push(task(4, Priority::Normal));
        queue.push(task(5, Priority::High));

        let order: Vec<u64> = drain(&queue).into_iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec![1, 3, 5, 2, 4]);
    }

    #[test]
    fn test_equal_to_head_goes_behind_head_band() {
        let queue = TaskQueue::new();
        queue.push(task(1, Priority::Normal));
        queue.push(task(2, Priority::Normal));
        assert_eq!(queue.pending_ids()[0].as_raw(), 1);
        assert_eq!(queue.position(TaskId::new(2).unwrap()), Some(1));
    }

    #[test]
    fn test_mixed_sequence_is_non_increasing_and_stable() {
        let priorities = [
            Priority::Normal,
            Priority::Low,
            Priority::Realtime,
            Priority::Normal,
            Priority::High,
            Priority::Low,
            Priority::Critical,
            Priority::High,
            Priority::Normal,
            Priority::Realtime,
        ];
        let queue = TaskQueue::new();
        for (i, p) in priorities.iter().enumerate() {
            queue.push(task(i as u64 + 1, *p));
        }

        let drained = drain(&queue);
        assert_eq!(drained.len(), priorities.len());
        for pair in drained.windows(2) {
            let (id_a, p_a) = pair[0];
            let (id_b, p_b) = pair[1];
            assert!(p_a >= p_b, "priority increased between {id_a} and {id_b}");
            if p_a == p_b {
                assert!(id_a < id_b, "equal priorities out of arrival order");
            }
        }
    }

    #[test]
    fn test_cancel_removes_only_target() {
        let queue = TaskQueue::new();
        queue.push(task(1, Priority::Normal));
        queue.push(task(2, Priority::Normal));
        queue.push(task(3, Priority::Normal));

        let cancelled = queue.cancel(TaskId::new(2).unwrap()).unwrap();
        assert_eq!(cancelled.id().as_raw(), 2);
        assert!(queue.cancel(TaskId::new(2).unwrap()).is_none());

        let order: Vec<u64> = drain(&queue).into_iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec![1, 3]);
    }

    #[test]
    fn test_concurrent_producers_lose_nothing() {
        const PRODUCERS: u64 = 8;
        const PER_PRODUCER: u64 = 250;

        let queue = Arc::new(TaskQueue::new());
        let handles: Vec<_> = (0..PRODUCERS)
            .map(|p| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    for i in 0..PER_PRODUCER {
                        let id = p * PER_PRODUCER + i + 1;
                        let priority = match id % 5 {
                            0 => Priority::Low,
                            1 => Priority::Normal,
                            2 => Priority::High,
                            3 => Priority::Critical,
                            _ => Priority::Realtime,
                        };
                        queue.push(task(id, priority));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let drained = drain(&queue);
        assert_eq!(drained.len() as u64, PRODUCERS * PER_PRODUCER);
        let distinct: HashSet<u64> = drained.iter().map(|(id, _)| *id).collect();
        assert_eq!(distinct.len(), drained.len());
        assert!(drained.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn test_concurrent_producers_and_consumer() {
        let queue = Arc::new(TaskQueue::new());
        let producer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                for id in 1..=500 {
                    queue.push(task(id, Priority::Normal));
                }
            })
        };

        let mut seen = HashSet::new();
        while seen.len() < 500 {
            if let Some(t) = queue.take_next() {
                assert!(seen.insert(t.id().as_raw()), "task dequeued twice");
            } else {
                thread::yield_now();
            }
        }
        producer.join().unwrap();
        assert!(queue.is_empty());
    }
}
