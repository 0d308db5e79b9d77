//! Frame dispatcher tests


use face_emotion::{
    classifier::{EmotionClassifier, HeuristicClassifier},
    dispatch::FrameDispatcher,
    emotion::{ClassSet, EmotionClass, EmotionResult},
    face_image::FaceImage,
    Error, Result,
};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use test_helpers::{four_class_config, random_face, smiling_face, test_rng};

/// Classifier that reports each call and then waits for a release signal
struct GatedClassifier {
    classes: ClassSet,
    started: Mutex<Sender<()>>,
    release: Mutex<Receiver<()>>,
}

impl EmotionClassifier for GatedClassifier {
    fn classify(&self, _face: &FaceImage) -> Result<EmotionResult> {
        self.started.lock().unwrap().send(()).ok();
        self.release.lock().unwrap().recv().ok();
        Ok(EmotionResult::from_weights(&[(EmotionClass::Neutral, 1.0)]))
    }

    fn classes(&self) -> &ClassSet {
        &self.classes
    }

    fn name(&self) -> &str {
        "GatedClassifier"
    }
}

fn gated() -> (Arc<GatedClassifier>, Receiver<()>, Sender<()>) {
    let (started_tx, started_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let classifier = GatedClassifier {
        classes: ClassSet::new(vec![EmotionClass::Neutral]).unwrap(),
        started: Mutex::new(started_tx),
        release: Mutex::new(release_rx),
    };
    (Arc::new(classifier), started_rx, release_tx)
}

#[test]
fn test_full_queue_drops_frames() {
    let (classifier, started, release) = gated();
    let mut dispatcher = FrameDispatcher::new(classifier, 1, 1).unwrap();
    let face = || FaceImage::uniform(48, 48, 100.0);

    // Worker picks up frame 0 and blocks
    assert_eq!(dispatcher.submit(face()).unwrap(), Some(0));
    started.recv_timeout(Duration::from_secs(5)).unwrap();

    // Frame 1 waits in the queue, frame 2 finds it full
    assert_eq!(dispatcher.submit(face()).unwrap(), Some(1));
    assert_eq!(dispatcher.submit(face()).unwrap(), None);

    let stats = dispatcher.stats();
    assert_eq!(stats.submitted, 3);
    assert_eq!(stats.dropped, 1);

    release.send(()).unwrap();
    release.send(()).unwrap();
    let outcomes = dispatcher.shutdown();
    let ids: Vec<u64> = outcomes.iter().map(|o| o.frame_id).collect();
    assert_eq!(ids, [0, 1]);
}

#[test]
fn test_counters_balance_after_shutdown() {
    let classifier: Arc<dyn EmotionClassifier> = Arc::new(HeuristicClassifier::new(&four_class_config()).unwrap());
    let mut dispatcher = FrameDispatcher::new(classifier, 2, 2).unwrap();
    let mut rng = test_rng();

    let mut accepted = 0;
    for _ in 0..50 {
        if dispatcher.submit(random_face(&mut rng, 48, 48)).unwrap().is_some() {
            accepted += 1;
        }
    }

    let mut received = Vec::new();
    while let Some(outcome) = dispatcher.try_recv() {
        received.push(outcome);
    }
    let before = dispatcher.stats();
    received.extend(dispatcher.shutdown());

    assert_eq!(before.submitted, 50);
    assert_eq!(received.len() as u64, 50 - before.dropped);
    assert_eq!(received.len(), accepted);
    assert!(received.iter().all(|o| o.result.is_ok()));
}

#[test]
fn test_outcomes_match_direct_classification() {
    let direct = HeuristicClassifier::new(&four_class_config()).unwrap();
    let expected = direct.classify(&smiling_face()).unwrap();

    let mut dispatcher = FrameDispatcher::new(Arc::new(direct), 1, 8).unwrap();
    let id = dispatcher.submit(smiling_face()).unwrap().unwrap();
    let outcome = dispatcher.recv_timeout(Duration::from_secs(5)).unwrap();

    assert_eq!(outcome.frame_id, id);
    assert_eq!(outcome.result.unwrap(), expected);
    assert_eq!(dispatcher.stats().processed, 1);
}

#[test]
fn test_wrong_shape_frames_are_reported_not_fatal() {
    let classifier = Arc::new(HeuristicClassifier::new(&four_class_config()).unwrap());
    let mut dispatcher = FrameDispatcher::new(classifier, 1, 8).unwrap();

    dispatcher.submit(FaceImage::uniform(20, 20, 50.0)).unwrap();
    dispatcher.submit(smiling_face()).unwrap();

    let mut outcomes = dispatcher.shutdown();
    outcomes.sort_by_key(|o| o.frame_id);
    assert!(matches!(outcomes[0].result, Err(Error::InputShape { .. })));
    assert_eq!(outcomes[1].result.as_ref().unwrap().label(), EmotionClass::Happy);
}
