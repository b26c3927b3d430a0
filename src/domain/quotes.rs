/// Motivational quotes shown alongside progress reports

use chrono::Timelike;
use serde::Serialize;

use crate::domain::CivilCalendar;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub text: &'static str,
    pub author: &'static str,
}

impl Quote {
    /// The quote for the current civil hour
    ///
    /// Stays the same for a whole hour, so repeated reports within it agree.
    pub fn of_the_hour(calendar: &CivilCalendar) -> Quote {
        let hour = calendar.now().hour() as usize;
        MOTIVATIONAL_QUOTES[hour % MOTIVATIONAL_QUOTES.len()]
    }
}

impl std::fmt::Display for Quote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" - {}", self.text, self.author)
    }
}

pub const MOTIVATIONAL_QUOTES: &[Quote] = &[
    Quote {
        text: "The last three or four reps is what makes the muscle grow. This area of pain divides a champion from someone who is not a champion.",
        author: "Arnold Schwarzenegger",
    },
    Quote {
        text: "Strength does not come from winning. Your struggles develop your strengths.",
        author: "Arnold Schwarzenegger",
    },
    Quote {
        text: "The worst thing I can be is the same as everybody else. I hate that.",
        author: "Arnold Schwarzenegger",
    },
    Quote {
        text: "You can't climb the ladder of success with your hands in your pockets.",
        author: "Arnold Schwarzenegger",
    },
    Quote {
        text: "The mind is the limit. As long as the mind can envision the fact that you can do something, you can do it.",
        author: "Arnold Schwarzenegger",
    },
    Quote {
        text: "Everybody wants to be a bodybuilder, but nobody wants to lift no heavy-ass weights.",
        author: "Ronnie Coleman",
    },
    Quote {
        text: "Yeah buddy! Lightweight baby!",
        author: "Ronnie Coleman",
    },
    Quote {
        text: "There's no secret formula. I lift heavy, work hard, and aim to be the best.",
        author: "Ronnie Coleman",
    },
    Quote {
        text: "I do it because I can, I can because I want to, I want to because you said I couldn't.",
        author: "Ronnie Coleman",
    },
    Quote {
        text: "You are in danger of living a life so comfortable and soft, that you will die without ever realizing your potential.",
        author: "David Goggins",
    },
    Quote {
        text: "We're either getting better or we're getting worse.",
        author: "David Goggins",
    },
    Quote {
        text: "Be uncommon amongst uncommon people.",
        author: "David Goggins",
    },
    Quote {
        text: "Suffering is the true test of life.",
        author: "David Goggins",
    },
    Quote {
        text: "The only way you're going to get better is to go back into the Dark Room and do what you hate to do.",
        author: "David Goggins",
    },
    Quote {
        text: "Don't stop when you're tired. Stop when you're done.",
        author: "David Goggins",
    },
    Quote {
        text: "Motivation is crap. Motivation comes and goes. When you're driven, whatever is in front of you will get destroyed.",
        author: "David Goggins",
    },
    Quote {
        text: "You have to build calluses on your brain just like you build calluses on your hands.",
        author: "David Goggins",
    },
    Quote {
        text: "I hated every minute of training, but I said, 'Don't quit. Suffer now and live the rest of your life as a champion.'",
        author: "Muhammad Ali",
    },
    Quote {
        text: "It isn't the mountains ahead to climb that wear you out; it's the pebble in your shoe.",
        author: "Muhammad Ali",
    },
    Quote {
        text: "He who is not courageous enough to take risks will accomplish nothing in life.",
        author: "Muhammad Ali",
    },
    Quote {
        text: "Success isn't always about greatness. It's about consistency. Consistent hard work leads to success.",
        author: "Dwayne Johnson",
    },
    Quote {
        text: "Blood, sweat and respect. First two you give, last one you earn.",
        author: "Dwayne Johnson",
    },
    Quote {
        text: "Wake up determined. Go to bed satisfied.",
        author: "Dwayne Johnson",
    },
    Quote {
        text: "Be the hardest worker in the room.",
        author: "Dwayne Johnson",
    },
    Quote {
        text: "It's still your motherf***ing set!",
        author: "CT Fletcher",
    },
    Quote {
        text: "I command you to grow!",
        author: "CT Fletcher",
    },
    Quote {
        text: "Pain is necessary. Pain is life. Without pain there is no growth.",
        author: "CT Fletcher",
    },
    Quote {
        text: "Discipline is doing what you hate to do but doing it like you love it.",
        author: "Mike Tyson",
    },
    Quote {
        text: "Everyone has a plan until they get punched in the mouth.",
        author: "Mike Tyson",
    },
    Quote {
        text: "Discipline equals freedom.",
        author: "Jocko Willink",
    },
    Quote {
        text: "Don't expect to be motivated every day. You must learn to be disciplined.",
        author: "Jocko Willink",
    },
    Quote {
        text: "Get after it.",
        author: "Jocko Willink",
    },
    Quote {
        text: "The pain you feel today will be the strength you feel tomorrow.",
        author: "Unknown",
    },
    Quote {
        text: "Your body can stand almost anything. It's your mind you have to convince.",
        author: "Unknown",
    },
    Quote {
        text: "The only bad workout is the one that didn't happen.",
        author: "Unknown",
    },
    Quote {
        text: "Sweat is just fat crying.",
        author: "Unknown",
    },
    Quote {
        text: "No pain, no gain. Shut up and train.",
        author: "Unknown",
    },
    Quote {
        text: "Excuses don't burn calories.",
        author: "Unknown",
    },
    Quote {
        text: "Train insane or remain the same.",
        author: "Unknown",
    },
    Quote {
        text: "Sore today. Strong tomorrow.",
        author: "Unknown",
    },
    Quote {
        text: "The body achieves what the mind believes.",
        author: "Unknown",
    },
    Quote {
        text: "Champions train, losers complain.",
        author: "Unknown",
    },
];
