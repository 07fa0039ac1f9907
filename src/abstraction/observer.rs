// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

/// An observer gets notified whenever a search discovers a goal, a dead end,
/// or an ordinary state for the first time. It is only meant for external
/// bookkeeping and never influences the search.
pub trait NewStateObserver<S> {
    fn notify_goal(&mut self, _state: &S) {}
    fn notify_dead(&mut self, _state: &S) {}
    fn notify_state(&mut self, _state: &S) {}
}

/// _This is the default observer._ It ignores all notifications.
#[derive(Debug, Default, Copy, Clone)]
pub struct NoObserver;
impl<S> NewStateObserver<S> for NoObserver {}
