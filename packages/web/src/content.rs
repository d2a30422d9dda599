//! Static page content.

pub struct Skill {
    pub name: &'static str,
    pub level: u8,
}

pub struct SkillCategory {
    pub title: &'static str,
    pub accent: &'static str,
    pub skills: [Skill; 5],
}

const fn skill(name: &'static str, level: u8) -> Skill {
    Skill { name, level }
}

pub const SKILL_CATEGORIES: [SkillCategory; 6] = [
    SkillCategory {
        title: "Frontend",
        accent: "accent-blue",
        skills: [
            skill("React", 90),
            skill("TypeScript", 85),
            skill("Next.js", 80),
            skill("CSS/SCSS", 85),
            skill("Tailwind CSS", 90),
        ],
    },
    SkillCategory {
        title: "Backend",
        accent: "accent-green",
        skills: [
            skill("Node.js", 85),
            skill("Express", 80),
            skill("NestJS", 75),
            skill("Python", 70),
            skill("GraphQL", 75),
        ],
    },
    SkillCategory {
        title: "Database",
        accent: "accent-amber",
        skills: [
            skill("MongoDB", 85),
            skill("PostgreSQL", 80),
            skill("Redis", 70),
            skill("Firebase", 75),
            skill("Prisma", 80),
        ],
    },
    SkillCategory {
        title: "DevOps",
        accent: "accent-red",
        skills: [
            skill("Docker", 75),
            skill("AWS", 70),
            skill("CI/CD", 65),
            skill("Kubernetes", 60),
            skill("Linux", 80),
        ],
    },
    SkillCategory {
        title: "Design",
        accent: "accent-purple",
        skills: [
            skill("Figma", 70),
            skill("UI/UX", 75),
            skill("Responsive Design", 85),
            skill("Wireframing", 80),
            skill("Photoshop", 65),
        ],
    },
    SkillCategory {
        title: "Tools & Libraries",
        accent: "accent-sky",
        skills: [
            skill("Git", 90),
            skill("Redux", 80),
            skill("Jest", 75),
            skill("Webpack", 70),
            skill("Material UI", 85),
        ],
    },
];

pub struct ContactChannel {
    pub title: &'static str,
    pub value: &'static str,
    pub href: &'static str,
}

pub const CONTACT_CHANNELS: [ContactChannel; 3] = [
    ContactChannel {
        title: "Email",
        value: "contact@example.com",
        href: "mailto:contact@example.com",
    },
    ContactChannel {
        title: "Phone",
        value: "+1 (123) 456-7890",
        href: "tel:+11234567890",
    },
    ContactChannel {
        title: "Location",
        value: "New York, NY",
        href: "https://maps.google.com",
    },
];
