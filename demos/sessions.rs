//! A simple session registry example.
//!
//! In this example, there are several threads:
//! -   Login threads open sessions, each under a fresh ID, and later close them.
//! -   A Gatekeeper thread "models" a continuous stream of requests, and for each checks whether the session ID of
//!     the request is currently open.
//!
//! The registry is shared by reference; no thread ever locks the whole of it, bar the occasional resize.

use std::{thread, time};

use stripemap::hashmap::StripedHashMap;

const NUMBER_LOGIN_THREADS: u64 = 4;
const NUMBER_SESSIONS_PER_THREAD: u64 = 50;

const PACE_TIME: time::Duration = time::Duration::from_millis(1);

fn main() {
    let sessions: StripedHashMap<u64, String> = StripedHashMap::with_expected_size_and_concurrency(
        (NUMBER_LOGIN_THREADS * NUMBER_SESSIONS_PER_THREAD) as usize,
        NUMBER_LOGIN_THREADS as usize + 1,
    );

    crossbeam_utils::thread::scope(|scope| {
        //
        //  Login threads
        //
        for login in 0..NUMBER_LOGIN_THREADS {
            let sessions = &sessions;

            scope.spawn(move |_| {
                let first = login * NUMBER_SESSIONS_PER_THREAD;

                for id in first..first + NUMBER_SESSIONS_PER_THREAD {
                    let opened = sessions.insert(id, format!("user-{}", id % 17));
                    assert!(opened, "Session {} opened twice", id);

                    thread::sleep(PACE_TIME);
                }

                //  Every other session is closed.
                for id in (first..first + NUMBER_SESSIONS_PER_THREAD).step_by(2) {
                    assert!(sessions.remove(&id));
                }
            });
        }

        //
        //  Gatekeeper
        //
        scope.spawn(|_| {
            let mut granted = 0;
            let mut denied = 0;

            for round in 0..20u64 {
                let id = round * 7 % (NUMBER_LOGIN_THREADS * NUMBER_SESSIONS_PER_THREAD);

                match sessions.get(&id) {
                    Some(user) => {
                        println!("Gatekeeper - request for session {} of {} granted", id, user);
                        granted += 1;
                    },
                    None => denied += 1,
                }

                thread::sleep(PACE_TIME * 5);
            }

            println!("Gatekeeper - {} granted, {} denied, {:?}", granted, denied, sessions);
        });
    })
    .unwrap();

    let open = NUMBER_LOGIN_THREADS * NUMBER_SESSIONS_PER_THREAD / 2;
    assert_eq!(open as usize, sessions.len());

    //  Odd sessions are still open.
    assert_eq!("user-1", sessions.at(&1));
    assert!(!sessions.contains_key(&0));
}
